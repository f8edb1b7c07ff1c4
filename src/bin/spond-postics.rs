//! Read events from iCal files and post them to a group

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use spond::ical::{parse_calendar, ParsedEvent};
use spond::traits::ApiClient;
use spond::{Credentials, EntityKind, Error, Owner, Result, Spond};

#[derive(Parser)]
#[command(author, version, about = "Read in iCal events from .ics file[s] and post them to Spond", long_about = None)]
struct Args {
    /// Echo the full events parsed
    #[arg(short, long)]
    verbose: bool,

    /// Do not echo event names
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// The id of the group to post to (default: the first group the user is the contact person of)
    #[arg(short, long)]
    gid: Option<String>,

    /// Path to one or more ics files
    #[arg(required = true)]
    filename: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut client = Spond::new(Credentials::from_env()?)?;
    let result = run(&mut client, &args).await;
    client.close();
    result
}

async fn run(client: &mut Spond, args: &Args) -> Result<()> {
    let username = client.session().username().to_string();
    let owner_id = client.get_person(&username).await?
        .profile()
        .map(|p| p.id().to_string())
        .ok_or_else(|| Error::NotFound { kind: EntityKind::Profile, id: username.clone() })?;

    let group_id = match &args.gid {
        Some(gid) => gid.clone(),
        None => client.get_groups().await?
            .iter()
            .find(|g| g.contact_person().map(|c| c.id() == owner_id).unwrap_or(false))
            .map(|g| g.id().to_string())
            .ok_or_else(|| Error::NotFound { kind: EntityKind::Group, id: format!("contact person {}", owner_id) })?,
    };

    if args.quiet == false {
        println!("Posting as {} ({}): {}", username, owner_id, group_id);
    }

    for filename in &args.filename {
        if args.quiet == false {
            println!("Reading {}:", filename.display());
        }
        let content = std::fs::read_to_string(filename)?;
        for parsed in parse_calendar(&content)? {
            if args.verbose {
                println!("{:#?}", parsed);
            } else if args.quiet == false {
                println!("{}", parsed.changes.heading.as_deref().unwrap_or_default());
            }
            post_event(client, parsed, &owner_id, &group_id).await?;
        }
    }
    Ok(())
}

/// Update the event whose id is the UID of `parsed`, or create a new one if there is none
async fn post_event(client: &mut Spond, parsed: ParsedEvent, owner_id: &str, group_id: &str) -> Result<()> {
    let ParsedEvent { uid, mut changes } = parsed;
    changes.owners = Some(vec![Owner::new(owner_id)]);

    if let Some(uid) = uid {
        match client.get_event(&uid).await {
            Ok(_) => {
                client.update_event(&uid, &changes).await?;
                return Ok(());
            },
            Err(err) if err.is_not_found() => log::info!("No event {} yet, creating it", uid),
            Err(err) => return Err(err),
        }
    }

    changes.recipients = Some(json!({ "group": { "id": group_id } }));
    client.create_event(&changes).await?;
    Ok(())
}

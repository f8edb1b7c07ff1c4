//! Export events to an iCal file

use std::path::PathBuf;

use clap::Parser;

use spond::traits::ApiClient;
use spond::{Credentials, EventFilter, Result, Spond};

#[derive(Parser)]
#[command(author, version, about = "Export Spond events to an iCal file", long_about = None)]
struct Args {
    /// The file to write
    #[arg(short, long, default_value = "./exports/spond.ics")]
    output: PathBuf,

    /// Only export the events of this group
    #[arg(short, long)]
    group: Option<String>,

    /// The max number of events to export
    #[arg(short, long, default_value_t = 100)]
    max: u32,
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
    let filter = EventFilter {
        group_id: args.group.clone(),
        max_events: args.max,
        ..EventFilter::default()
    };
    let events = client.get_events(&filter).await?;
    let calendar = spond::ical::build_calendar(events);

    if let Some(folder) = args.output.parent() {
        std::fs::create_dir_all(folder)?;
    }
    std::fs::write(&args.output, calendar)?;
    println!("Exported {} events to {}", events.len(), args.output.display());
    Ok(())
}

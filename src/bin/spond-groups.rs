//! Dump every group to a JSON file

use clap::Parser;

use spond::traits::ApiClient;
use spond::utils::{export_path, print_group_list, sanitize_file_name, EXPORT_FOLDER};
use spond::{Credentials, Result, Spond};

#[derive(Parser)]
#[command(author, version, about = "Write one JSON file per Spond group", long_about = None)]
struct Args {
    /// The folder to write to
    #[arg(short, long, default_value = EXPORT_FOLDER)]
    output: String,

    /// Also print the members of each group
    #[arg(short, long)]
    verbose: bool,
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
    let groups = client.get_groups().await?;
    if args.verbose {
        print_group_list(groups);
    }

    for group in groups {
        let path = export_path(&args.output, &format!("{}.json", sanitize_file_name(group.name())))?;
        std::fs::write(&path, serde_json::to_string_pretty(group)?)?;
        println!("{}", path.display());
    }
    Ok(())
}

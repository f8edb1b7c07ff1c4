//! Dump the payments of a club to a JSON file

use clap::Parser;

use spond::traits::ApiClient;
use spond::utils::{export_path, EXPORT_FOLDER};
use spond::{Credentials, Result, SpondClub};

#[derive(Parser)]
#[command(author, version, about = "Write the transactions of a Spond Club to transactions.json", long_about = None)]
struct Args {
    /// The club to query. Defaults to SPOND_CLUB_ID, from the environment or a `.env` file
    #[arg(short, long)]
    club_id: Option<String>,

    /// The max number of transactions to query for
    #[arg(short, long, default_value_t = 1000)]
    max: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut client = SpondClub::new(Credentials::from_env()?)?;
    let result = run(&mut client, &args).await;
    client.close();
    result
}

async fn run(client: &mut SpondClub, args: &Args) -> Result<()> {
    let club_id = match &args.club_id {
        Some(id) => id.clone(),
        None => spond::config::club_id_from_env()?,
    };
    let transactions = client.get_transactions(&club_id, args.max).await?;
    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let path = export_path(EXPORT_FOLDER, "transactions.json")?;
    std::fs::write(&path, serde_json::to_string_pretty(transactions)?)?;
    println!("Collected {} transactions. Written to {}", transactions.len(), path.display());
    Ok(())
}

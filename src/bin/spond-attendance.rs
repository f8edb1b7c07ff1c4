//! Export the attendance of the events between two dates

use chrono::{NaiveDate, TimeZone, Utc};
use clap::Parser;

use spond::attendance::{attendance_rows, write_csv};
use spond::traits::ApiClient;
use spond::utils::{export_path, print_event, sanitize_file_name, EXPORT_FOLDER};
use spond::{Credentials, Error, EventFilter, Result, Spond};

#[derive(Parser)]
#[command(author, version, about = "Write the attendance of Spond events to CSV files", long_about = None)]
struct Args {
    /// Start date to query for (format YYYY-MM-DD)
    start: NaiveDate,
    /// End date to query for (format YYYY-MM-DD)
    end: NaiveDate,

    /// Also include members
    #[arg(long)]
    members: bool,
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
    let midnight = |date: NaiveDate| {
        date.and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt))
            .ok_or_else(|| Error::Config(format!("invalid date {}", date)))
    };
    let filter = EventFilter {
        min_start: Some(midnight(args.start)?),
        max_end: Some(midnight(args.end)?),
        ..EventFilter::default()
    };

    let events = client.get_events(&filter).await?.to_vec();
    for event in &events {
        print_event(event);
        let rows = attendance_rows(client, event, args.members).await?;

        let file_name = format!("{}-{}.csv", event.start_time().format("%Y-%m-%dT%H%M"), event.heading());
        let path = export_path(EXPORT_FOLDER, &sanitize_file_name(&file_name))?;
        write_csv(&rows, std::fs::File::create(&path)?)?;
    }
    Ok(())
}

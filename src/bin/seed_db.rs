use std::{error::Error, sync::Arc};

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{
    DEFAULT_SEED_URL, FileSeedSource, HttpSeedSource, SeedSource, count_transactions,
    initialize_db, seed_transactions,
};

/// A utility for loading the product dataset into a database without running the server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long, env = "DB_PATH", default_value = "transactions.db")]
    db_path: String,

    /// An http(s) URL or a path to a JSON file containing the seed transactions.
    #[arg(long, short, default_value = DEFAULT_SEED_URL)]
    source: String,
}

/// Append the seed transactions to the database.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let source: Arc<dyn SeedSource> =
        if args.source.starts_with("http://") || args.source.starts_with("https://") {
            Arc::new(HttpSeedSource::new(&args.source))
        } else {
            Arc::new(FileSeedSource::new(&args.source))
        };

    println!("Fetching seed data from {}...", args.source);
    let transactions = source.fetch().await?;

    println!("Writing {} transactions to {}...", transactions.len(), args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;
    seed_transactions(&transactions, &conn)?;

    println!(
        "Success! The database now holds {} transactions.",
        count_transactions(&conn)?
    );

    Ok(())
}

use std::{error::Error, path::Path};

use clap::Parser;
use log::{info, warn};
use nba_ingest::{
    db::{
        nba::ingest::{run, Mode},
        prod_db::ProdDb,
    },
    utils::lib_http::BlockingClient,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Download the raw CSV files, load them into DuckDB, or both
    #[arg(value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Environment name, e.g., test, prod
    #[arg(short, long, default_value = "prod")]
    env: String,
}

/// Download the NBA advanced stats for all seasons and rebuild the
/// adv_regular and adv_playoffs tables.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let env_file = format!(".env/{}.env", args.env);
    match dotenvy::from_path(Path::new(&env_file)) {
        Ok(_) => info!("loaded {}", env_file),
        Err(e) => warn!("{} not loaded ({}), using defaults", env_file, e),
    }

    let archive = ProdDb::nba_advanced_stats()?;
    let client = BlockingClient::new(&archive.user_agent, archive.timeout)?;
    run(&archive, &client, args.mode)?;

    Ok(())
}

use std::{env, str::FromStr, time::Duration};

use crate::{db::nba::advanced_stats_archive::NbaAdvancedStatsArchive, error::IngestError};

pub struct ProdDb {}

impl ProdDb {
    /// Production archive.  Defaults can be overridden with the `NBA_RAW_DIR`,
    /// `NBA_DUCKDB_PATH`, `NBA_BASE_URL`, `NBA_START_YEAR`, `NBA_END_YEAR` and
    /// `NBA_SLEEP_MS` environment variables.
    pub fn nba_advanced_stats() -> Result<NbaAdvancedStatsArchive, IngestError> {
        let defaults = NbaAdvancedStatsArchive::default();
        let archive = NbaAdvancedStatsArchive {
            base_dir: env_or("NBA_RAW_DIR", defaults.base_dir)?,
            duckdb_path: env_or("NBA_DUCKDB_PATH", defaults.duckdb_path)?,
            base_url: env_or("NBA_BASE_URL", defaults.base_url)?,
            start_year: env_or("NBA_START_YEAR", defaults.start_year)?,
            end_year: env_or("NBA_END_YEAR", defaults.end_year)?,
            sleep: Duration::from_millis(env_or(
                "NBA_SLEEP_MS",
                defaults.sleep.as_millis() as u64,
            )?),
            ..defaults
        };
        archive.validate()?;
        Ok(archive)
    }
}

/// Parse the environment variable `key` if set, else return `default`.
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, IngestError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| IngestError::InvalidConfig(format!("can't parse {}={}", key, value))),
        Err(_) => Ok(default),
    }
}

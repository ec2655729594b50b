use std::path::PathBuf;

use clap::ValueEnum;
use log::{info, warn};

use crate::error::IngestError;
use crate::utils::lib_http::HttpGet;

use super::advanced_stats_archive::{count_csv_rows, LoadSummary, NbaAdvancedStatsArchive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Download the raw files, then load them
    #[default]
    All,
    /// Only download the raw files
    Download,
    /// Only load the raw files already on disk
    Load,
}

impl Mode {
    pub fn downloads(&self) -> bool {
        matches!(self, Mode::All | Mode::Download)
    }

    pub fn loads(&self) -> bool {
        matches!(self, Mode::All | Mode::Load)
    }
}

#[derive(Debug, Default)]
pub struct IngestSummary {
    pub downloaded: Vec<PathBuf>,
    pub loaded: Option<LoadSummary>,
}

/// Download and/or load the NBA advanced stats, depending on the `mode`.
pub fn run(
    archive: &NbaAdvancedStatsArchive,
    client: &impl HttpGet,
    mode: Mode,
) -> Result<IngestSummary, IngestError> {
    archive.validate()?;
    let mut summary = IngestSummary::default();

    if mode.downloads() {
        summary.downloaded = archive.download_all(client)?;
    }

    if mode.loads() {
        let loaded = archive.update_duckdb()?;
        for table in [&loaded.regular, &loaded.playoffs] {
            let expected = count_csv_rows(&table.files)?;
            if expected != table.rows {
                warn!(
                    "{} has {} rows but its {} files have {} data rows",
                    table.table,
                    table.rows,
                    table.files.len(),
                    expected
                );
            }
        }
        let (regular, playoffs) = loaded.row_counts();
        println!("Rows loaded → {} regular | {} playoffs", regular, playoffs);
        summary.loaded = Some(loaded);
    }

    info!("{:?} finished", mode);
    println!("✓ Ingest complete → {}", archive.duckdb_path);
    Ok(summary)
}

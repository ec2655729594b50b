use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can abort an ingest run.  None of these are recovered from,
/// they propagate up to the binary.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download of {url} failed with status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    DuckDb(#[from] duckdb::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("no csv files to load into {table} from {}", .dir.display())]
    NoSourceFiles { table: &'static str, dir: PathBuf },

    #[error("year {year} is outside of the configured range {start}-{end}")]
    YearOutOfRange { year: i32, start: i32, end: i32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}

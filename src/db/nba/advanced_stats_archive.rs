// Player advanced stats (PER, TS%, WS, BPM, ...) for every NBA season,
// regular season and playoffs, as published by Basketball-Reference.
// https://www.basketball-reference.com/leagues/NBA_2024_advanced.html

use duckdb::Connection;
use log::info;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::IngestError;
use crate::utils::lib_duckdb::{count_rows, open_with_retry, replace_table_from_csv};
use crate::utils::lib_http::{download_file, HttpGet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonType {
    Regular,
    Playoffs,
}

impl SeasonType {
    /// In download order.
    pub const ALL: [SeasonType; 2] = [SeasonType::Regular, SeasonType::Playoffs];

    /// Path segment on the website
    pub fn url_segment(&self) -> &'static str {
        match self {
            SeasonType::Regular => "leagues",
            SeasonType::Playoffs => "playoffs",
        }
    }

    /// Subdirectory of the raw archive
    pub fn dir_name(&self) -> &'static str {
        match self {
            SeasonType::Regular => "regular",
            SeasonType::Playoffs => "playoffs",
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            SeasonType::Regular => "adv_regular",
            SeasonType::Playoffs => "adv_playoffs",
        }
    }
}

impl Display for SeasonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub season_type: SeasonType,
    pub table: &'static str,
    pub files: Vec<PathBuf>,
    pub rows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub regular: TableLoad,
    pub playoffs: TableLoad,
}

impl LoadSummary {
    pub fn row_counts(&self) -> (u64, u64) {
        (self.regular.rows, self.playoffs.rows)
    }
}

#[derive(Debug, Clone)]
pub struct NbaAdvancedStatsArchive {
    /// Raw CSV files go in `base_dir/regular` and `base_dir/playoffs`
    pub base_dir: String,
    pub duckdb_path: String,
    pub base_url: String,
    /// First season to download, inclusive
    pub start_year: i32,
    /// Last season to download, inclusive
    pub end_year: i32,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause after every download, to go easy on the website
    pub sleep: Duration,
}

impl Default for NbaAdvancedStatsArchive {
    fn default() -> Self {
        NbaAdvancedStatsArchive {
            base_dir: "data/raw".to_string(),
            duckdb_path: "nba.duckdb".to_string(),
            base_url: "https://www.basketball-reference.com".to_string(),
            start_year: 2000,
            end_year: 2024,
            user_agent: "Mozilla/5.0".to_string(),
            timeout: Duration::from_secs(30),
            sleep: Duration::from_secs(1),
        }
    }
}

impl NbaAdvancedStatsArchive {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.start_year > self.end_year {
            return Err(IngestError::InvalidConfig(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        Ok(())
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    fn check_year(&self, year: i32) -> Result<(), IngestError> {
        if !self.years().contains(&year) {
            return Err(IngestError::YearOutOfRange {
                year,
                start: self.start_year,
                end: self.end_year,
            });
        }
        Ok(())
    }

    /// Url of the advanced stats CSV for one season.
    pub fn url(&self, year: i32, season_type: SeasonType) -> String {
        format!(
            "{}/{}/NBA_{}_advanced.csv",
            self.base_url.trim_end_matches('/'),
            season_type.url_segment(),
            year
        )
    }

    pub fn source_dir(&self, season_type: SeasonType) -> PathBuf {
        Path::new(&self.base_dir).join(season_type.dir_name())
    }

    /// Return the CSV filename for the season.  Does not check if the file exists.
    pub fn filename(&self, year: i32, season_type: SeasonType) -> PathBuf {
        self.source_dir(season_type).join(format!("{}.csv", year))
    }

    /// Download one season and write it to the archive, overwriting the file if
    /// it is already there.  Sleeps after the download.
    pub fn download_file(
        &self,
        client: &impl HttpGet,
        year: i32,
        season_type: SeasonType,
    ) -> Result<PathBuf, IngestError> {
        self.check_year(year)?;
        let url = self.url(year, season_type);
        let path = self.filename(year, season_type);
        println!("↳ {}", url);
        download_file(client, &url, &path)?;
        info!("  saved {}", path.display());
        std::thread::sleep(self.sleep);
        Ok(path)
    }

    /// Download regular season and playoffs for each of the years, one request
    /// at a time.  Stops at the first failure.
    pub fn download_years(
        &self,
        client: &impl HttpGet,
        years: &[i32],
    ) -> Result<Vec<PathBuf>, IngestError> {
        let mut paths = Vec::with_capacity(2 * years.len());
        for &year in years {
            for season_type in SeasonType::ALL {
                paths.push(self.download_file(client, year, season_type)?);
            }
        }
        Ok(paths)
    }

    pub fn download_all(&self, client: &impl HttpGet) -> Result<Vec<PathBuf>, IngestError> {
        self.validate()?;
        let years: Vec<i32> = self.years().collect();
        info!(
            "downloading advanced stats for seasons {}-{} ...",
            self.start_year, self.end_year
        );
        let paths = self.download_years(client, &years)?;
        info!("downloaded {} files", paths.len());
        Ok(paths)
    }

    /// CSV files in the archive for this season type, sorted by name.  A
    /// missing directory has no files.
    pub fn csv_files(&self, season_type: SeasonType) -> Result<Vec<PathBuf>, IngestError> {
        let dir = self.source_dir(season_type);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(IngestError::io(dir, e)),
        };
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| IngestError::io(&dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Recreate the table for this season type from all the CSV files in its
    /// directory.  Fails without touching the table if there are no files.
    pub fn load_table(
        &self,
        conn: &mut Connection,
        season_type: SeasonType,
    ) -> Result<TableLoad, IngestError> {
        let table = season_type.table_name();
        let files = self.csv_files(season_type)?;
        if files.is_empty() {
            return Err(IngestError::NoSourceFiles {
                table,
                dir: self.source_dir(season_type),
            });
        }
        info!("loading {} {} files into {} ...", files.len(), season_type, table);
        let pattern = format!("{}/*.csv", self.source_dir(season_type).display());
        replace_table_from_csv(conn, table, &pattern)?;
        let rows = count_rows(conn, table)?;
        info!("  {} has {} rows", table, rows);
        Ok(TableLoad {
            season_type,
            table,
            files,
            rows,
        })
    }

    /// Rebuild both tables, regular season first.  If the playoffs fail, the
    /// regular season table is already rebuilt.
    pub fn load_tables(&self, conn: &mut Connection) -> Result<LoadSummary, IngestError> {
        let regular = self.load_table(conn, SeasonType::Regular)?;
        let playoffs = self.load_table(conn, SeasonType::Playoffs)?;
        Ok(LoadSummary { regular, playoffs })
    }

    /// Load all the raw files in the archive into the DuckDB file.
    pub fn update_duckdb(&self) -> Result<LoadSummary, IngestError> {
        info!("updating {} ...", self.duckdb_path);
        let mut conn = open_with_retry(
            Path::new(&self.duckdb_path),
            8,
            Duration::from_millis(25),
        )?;
        let summary = self.load_tables(&mut conn)?;
        info!("done");
        Ok(summary)
    }
}

/// Number of data rows, headers excluded, in all the CSV files.
pub fn count_csv_rows(files: &[PathBuf]) -> Result<u64, IngestError> {
    let mut n = 0;
    for file in files {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(file)?;
        for record in rdr.records() {
            record?;
            n += 1;
        }
    }
    Ok(n)
}

use std::{path::Path, time::Duration};

use duckdb::Connection;
use log::warn;

/// Open a DuckDB file for writing.  Another process holding the file lock makes
/// the open fail, so wait a bit and try again, doubling the wait each time.
/// Suggested `max_attempts = 8`, `initial_wait = Duration::from_millis(25)`.
pub fn open_with_retry(
    duckdb_path: &Path,
    max_attempts: u32,
    initial_wait: Duration,
) -> Result<Connection, duckdb::Error> {
    let mut attempts = 0;
    let mut wait_duration = initial_wait;

    loop {
        match Connection::open(duckdb_path) {
            Ok(conn) => return Ok(conn),
            Err(e) => {
                attempts += 1;
                if attempts >= max_attempts {
                    return Err(e);
                }
                warn!(
                    "Retrying to open {} after error: {} (attempt {}/{})",
                    duckdb_path.display(),
                    e,
                    attempts,
                    max_attempts
                );
                std::thread::sleep(wait_duration);
                wait_duration *= 2;
            }
        }
    }
}

/// Quote a string as a SQL literal.
pub fn sql_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Replace `table` with the contents of all the CSV files matching `pattern`.
/// Columns are matched by name across files and their types are sniffed by
/// DuckDB.  Drop and create happen in one transaction, so readers see either
/// the old table or the new one.  On error the old table is left as it was.
pub fn replace_table_from_csv(
    conn: &mut Connection,
    table: &str,
    pattern: &str,
) -> Result<(), duckdb::Error> {
    let sql = format!(
        r#"
DROP TABLE IF EXISTS {table};

CREATE TABLE {table}
AS SELECT * FROM read_csv_auto({}, header = true, union_by_name = true);
"#,
        sql_literal(pattern)
    );
    let tx = conn.transaction()?;
    tx.execute_batch(&sql)?;
    tx.commit()
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<u64, duckdb::Error> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    Ok(n as u64)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, duckdb::Error> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?;",
        [table],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

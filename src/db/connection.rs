use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

/// Open (creating if needed) the database file at `db_path` and make sure the
/// `coins` table exists. The parent directory is created on demand so a fresh
/// install needs no manual setup.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    let started_at = Instant::now();

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = match Connection::open(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open status=error mode=file path={} error={}",
                db_path.display(),
                err
            );
            return Err(err).context("failed to open SQLite database");
        }
    };
    create_tables(&conn)?;

    info!(
        "event=store_open status=ok mode=file path={} duration_ms={}",
        db_path.display(),
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Same schema as [`ensure_schema`] but backed by memory. Used by tests and
/// anything that wants a throwaway collection.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS coins (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            series TEXT NOT NULL,
            year INTEGER NOT NULL,
            mint_mark TEXT,
            is_collected INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("failed to create coins table")?;

    Ok(())
}

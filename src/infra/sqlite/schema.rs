use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS claim_import (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            source_path TEXT NOT NULL,
            row_count   INTEGER NOT NULL,
            imported_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS claim (
            row_idx           INTEGER PRIMARY KEY,
            import_id         INTEGER NOT NULL,
            id                TEXT NOT NULL UNIQUE,
            patient           TEXT NOT NULL,
            patient_id        TEXT NOT NULL,
            service_date      TEXT NOT NULL,
            insurance_carrier TEXT NOT NULL,
            insurance_plan    TEXT NOT NULL,
            insurance_type    TEXT NOT NULL,
            amount            REAL NOT NULL,
            status            TEXT NOT NULL,
            last_updated      TEXT NOT NULL,
            user_name         TEXT NOT NULL,
            user_initials     TEXT NOT NULL,
            date_sent         TEXT NOT NULL,
            date_sent_orig    TEXT NOT NULL,
            pms_sync_status   TEXT NOT NULL,
            pms_sync_message  TEXT NOT NULL,
            provider          TEXT NOT NULL,
            provider_id       TEXT NOT NULL,
            FOREIGN KEY (import_id) REFERENCES claim_import(id)
        );
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}

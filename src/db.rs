// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Wellcast", "wellcast"));

/// Location of the database file. An explicit path (from `--db` or
/// `WELLCAST_DB`) wins over the platform data dir.
pub fn db_path(override_path: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = override_path.map(str::trim).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(p);
        if let Some(parent) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(path);
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("wellcast.sqlite"))
}

pub fn open_or_init(override_path: Option<&str>) -> Result<Connection> {
    let path = db_path(override_path)?;
    debug!(path = %path.display(), "opening database");
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS wells(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        field TEXT,
        zone TEXT,
        type TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- append-only; rows are never updated
    CREATE TABLE IF NOT EXISTS forecast_cases(
        case_id INTEGER PRIMARY KEY AUTOINCREMENT,
        well_name TEXT NOT NULL,
        case_label TEXT NOT NULL,
        eff_date TEXT NOT NULL,
        qi REAL NOT NULL,
        di REAL NOT NULL,
        b REAL NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_cases_label ON forecast_cases(case_label);
    CREATE INDEX IF NOT EXISTS idx_cases_eff_date ON forecast_cases(eff_date);
    "#,
    )
    .context("Failed to initialise schema")?;
    Ok(())
}

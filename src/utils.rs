// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};

pub const DEFAULT_ABANDONMENT_RATE: f64 = 10.0;
pub const DEFAULT_END_DATE: &str = "2040-01-01";

pub const SETTING_KEYS: [&str; 2] = ["abandonment_rate", "end_date"];

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_number(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid number '{}'", s))
}

/// Required string argument, trimmed.
pub fn arg_str<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("Missing required argument '--{}'", id))
}

pub fn opt_str<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Collected `--label` values, trimmed, blanks dropped.
pub fn labels_arg(m: &clap::ArgMatches) -> Vec<String> {
    m.get_many::<String>("label")
        .map(|vals| {
            vals.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub fn fmt_rate(v: f64) -> String {
    format!("{:.2}", v)
}

/// Volume in millions, as shown in EUR tables.
pub fn fmt_mm(v: f64) -> String {
    format!("{:.2}", v / 1_000_000.0)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    match key {
        "abandonment_rate" => {
            let q = parse_number(value)?;
            if !q.is_finite() || q < 0.0 {
                return Err(anyhow!("abandonment_rate must be >= 0, got {}", value));
            }
        }
        "end_date" => {
            parse_date(value)?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown setting '{}' (known: {})",
                key,
                SETTING_KEYS.join(", ")
            ));
        }
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value.trim()],
    )?;
    Ok(())
}

pub fn default_abandonment_rate(conn: &Connection) -> Result<f64> {
    match get_setting(conn, "abandonment_rate")? {
        Some(s) => parse_number(&s).context("Stored abandonment_rate is not a number"),
        None => Ok(DEFAULT_ABANDONMENT_RATE),
    }
}

pub fn default_end_date(conn: &Connection) -> Result<NaiveDate> {
    let s = get_setting(conn, "end_date")?.unwrap_or_else(|| DEFAULT_END_DATE.to_string());
    parse_date(&s).context("Stored end_date is not a date")
}

/// End date and abandonment rate for a forecast request: explicit flags
/// first, stored settings second, built-in defaults last.
pub fn forecast_params(conn: &Connection, m: &clap::ArgMatches) -> Result<(NaiveDate, f64)> {
    let end = match opt_str(m, "end") {
        Some(s) => parse_date(s)?,
        None => default_end_date(conn)?,
    };
    let q_abnd = match opt_str(m, "abandonment") {
        Some(s) => parse_number(s)?,
        None => default_abandonment_rate(conn)?,
    };
    Ok((end, q_abnd))
}

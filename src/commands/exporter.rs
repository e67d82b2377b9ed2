// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::forecast::run_aggregation;
use crate::forecast::Aggregation;
use crate::utils::arg_str;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("forecast", sub)) => export_forecast(conn, sub),
        _ => Ok(()),
    }
}

fn export_forecast(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg_str(sub, "format")?.to_lowercase();
    let out = arg_str(sub, "out")?;
    let view = arg_str(sub, "view")?.to_lowercase();

    if !matches!(fmt.as_str(), "csv" | "json") {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    if !matches!(view.as_str(), "summed" | "raw" | "pivot" | "eur") {
        bail!("Unknown view: {} (use summed|raw|pivot|eur)", view);
    }

    let Some(agg) = run_aggregation(conn, sub)? else {
        return Ok(());
    };
    let path = Path::new(out);
    match fmt.as_str() {
        "csv" => write_csv(path, &view, &agg)?,
        _ => write_json(path, &view, &agg)?,
    }
    println!("Exported {} forecast to {}", view, out);
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Create {}", path.display()))?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_csv(path: &Path, view: &str, agg: &Aggregation) -> Result<()> {
    match view {
        "raw" => write_rows(path, &agg.raw_rows()),
        "eur" => write_rows(path, &agg.per_well_eur),
        "pivot" => {
            let table = agg.pivot_rates();
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("Create {}", path.display()))?;
            let mut header = vec!["date".to_string()];
            header.extend(table.labels.iter().cloned());
            wtr.write_record(&header)?;
            for r in &table.rows {
                let mut rec = vec![r.date.to_string()];
                rec.extend(r.values.iter().map(|v| v.to_string()));
                wtr.write_record(&rec)?;
            }
            wtr.flush()?;
            Ok(())
        }
        _ => write_rows(path, &agg.summed),
    }
}

fn write_json(path: &Path, view: &str, agg: &Aggregation) -> Result<()> {
    let body = match view {
        "raw" => serde_json::to_string_pretty(&agg.raw_rows())?,
        "eur" => serde_json::to_string_pretty(&serde_json::json!({
            "wells": agg.per_well_eur,
            "totals": agg.per_case_total,
        }))?,
        "pivot" => serde_json::to_string_pretty(&agg.pivot_rates())?,
        _ => serde_json::to_string_pretty(&agg.summed)?,
    };
    std::fs::write(path, body).with_context(|| format!("Write {}", path.display()))?;
    Ok(())
}

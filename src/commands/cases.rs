// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ForecastCase, NewCase};
use crate::repository::CaseStore;
use crate::utils::{
    arg_str, labels_arg, maybe_print_json, parse_date, parse_number, pretty_table,
};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use rusqlite::Connection;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = CaseStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => add(&store, sub)?,
        Some(("import", sub)) => {
            import(&store, sub)?;
        }
        Some(("list", sub)) => list(&store, sub)?,
        Some(("labels", _)) => {
            for label in store.labels()? {
                println!("{}", label);
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &CaseStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let row = NewCase {
        well_name: Some(arg_str(sub, "well")?.to_string()),
        case_label: Some(arg_str(sub, "label")?.to_string()),
        eff_date: Some(parse_date(arg_str(sub, "eff_date")?)?),
        qi: Some(parse_number(arg_str(sub, "qi")?)?),
        di: Some(parse_number(arg_str(sub, "di")?)?),
        b: Some(parse_number(arg_str(sub, "b")?)?),
    };
    let id = store.insert_case(&row).context("Case rejected")?;
    println!(
        "Added case #{} '{}' for {}",
        id,
        row.case_label.unwrap_or_default().trim(),
        row.well_name.unwrap_or_default().trim()
    );
    Ok(())
}

/// Batch entry from CSV. Rows that cannot be read or do not validate are
/// skipped; returns the number of rows stored.
pub fn import(store: &CaseStore<'_>, sub: &clap::ArgMatches) -> Result<usize> {
    let path = arg_str(sub, "path")?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut rows = Vec::new();
    let mut total = 0usize;
    for (idx, result) in rdr.deserialize::<NewCase>().enumerate() {
        total += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(err) => warn!(row = idx + 1, "skipping unreadable case row: {}", err),
        }
    }

    let inserted = store.insert_cases(&rows)?;
    if inserted == 0 {
        println!("⚠️ No valid case rows in {}", path);
    } else {
        println!(
            "✅ Imported {} of {} case row(s) from {}",
            inserted, total, path
        );
    }
    Ok(inserted)
}

fn list(store: &CaseStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let labels = labels_arg(sub);
    let data: Vec<ForecastCase> = if labels.is_empty() {
        store.load_cases()?
    } else {
        store.load_cases_for(&labels)?
    };
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.case_id.to_string(),
                    c.well_name.clone(),
                    c.case_label.clone(),
                    c.eff_date.to_string(),
                    c.qi.to_string(),
                    format!("{:.6}", c.di),
                    c.b.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Well", "Case", "Eff Date", "qi", "di (1/day)", "b"],
                rows
            )
        );
    }
    Ok(())
}

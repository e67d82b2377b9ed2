// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::forecast::{Aggregation, aggregate_cases, build_profile, compute_eur};
use crate::models::PivotTable;
use crate::repository::CaseStore;
use crate::utils::{
    arg_str, fmt_mm, fmt_rate, forecast_params, labels_arg, maybe_print_json, opt_str,
    parse_date, parse_number, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("eur", sub)) => eur(conn, sub)?,
        Some(("series", sub)) => series(conn, sub)?,
        Some(("curve", sub)) => curve(sub)?,
        _ => {}
    }
    Ok(())
}

/// Load the selected labels' cases and aggregate them. `None` means nothing
/// was selected; a warning has already been printed.
pub fn run_aggregation(conn: &Connection, sub: &clap::ArgMatches) -> Result<Option<Aggregation>> {
    let labels = labels_arg(sub);
    if labels.is_empty() {
        eprintln!("⚠️ Select at least one case label (--label).");
        return Ok(None);
    }
    let (end, q_abnd) = forecast_params(conn, sub)?;
    let cases = CaseStore::new(conn).load_cases_for(&labels)?;
    let agg = aggregate_cases(&cases, &labels, end, q_abnd);
    if agg.is_empty() {
        eprintln!("⚠️ No forecast data for the selected case label(s).");
    }
    Ok(Some(agg))
}

fn eur(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let Some(agg) = run_aggregation(conn, sub)? else {
        return Ok(());
    };
    let json_flag = sub.get_flag("json");
    if json_flag {
        let v = json!({ "wells": agg.per_well_eur, "totals": agg.per_case_total });
        return maybe_print_json(true, false, &v).map(|_| ());
    }
    if maybe_print_json(false, sub.get_flag("jsonl"), &agg.per_well_eur)? {
        return Ok(());
    }

    let wells = agg
        .per_well_eur
        .iter()
        .map(|r| {
            vec![
                r.well.clone(),
                r.case_label.clone(),
                r.eff_date.to_string(),
                format!("{:.2}", r.eur),
                fmt_mm(r.eur),
            ]
        })
        .collect();
    println!("EUR Summary");
    println!(
        "{}",
        pretty_table(&["Well", "Case", "Eff Date", "EUR", "EUR (MM)"], wells)
    );

    let totals = agg
        .per_case_total
        .iter()
        .map(|r| vec![r.case_label.clone(), format!("{:.2}", r.eur), fmt_mm(r.eur)])
        .collect();
    println!("Total EUR by Case");
    println!("{}", pretty_table(&["Case", "EUR", "EUR (MM)"], totals));
    Ok(())
}

fn series(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let Some(agg) = run_aggregation(conn, sub)? else {
        return Ok(());
    };
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    if sub.get_flag("raw") {
        let rows = agg.raw_rows();
        if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
            let data = rows
                .into_iter()
                .map(|r| vec![r.date.to_string(), r.case_label, r.well_name, fmt_rate(r.rate)])
                .collect();
            println!("{}", pretty_table(&["Date", "Case", "Well", "Rate"], data));
        }
    } else if sub.get_flag("pivot") {
        let table = if sub.get_flag("cumulative") {
            agg.pivot_cumulative()
        } else {
            agg.pivot_rates()
        };
        if !maybe_print_json(json_flag, jsonl_flag, &table)? {
            print_pivot(&table);
        }
    } else if sub.get_flag("annotations") {
        let notes = agg.annotations();
        if !maybe_print_json(json_flag, jsonl_flag, &notes)? {
            let data = notes
                .into_iter()
                .map(|a| {
                    vec![
                        a.case_label,
                        a.well_name,
                        a.date.to_string(),
                        fmt_rate(a.rate),
                        fmt_rate(a.cumulative),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Case", "Well", "Online", "Rate", "Cumulative"], data)
            );
        }
    } else if !maybe_print_json(json_flag, jsonl_flag, &agg.summed)? {
        let data = agg
            .summed
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.case_label.clone(),
                    fmt_rate(r.rate),
                    fmt_rate(r.cumulative),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Case", "Rate", "Cumulative"], data)
        );
    }
    Ok(())
}

fn print_pivot(table: &PivotTable) {
    let mut headers = vec!["Date"];
    headers.extend(table.labels.iter().map(String::as_str));
    let data = table
        .rows
        .iter()
        .map(|r| {
            let mut row = vec![r.date.to_string()];
            row.extend(r.values.iter().map(|v| fmt_rate(*v)));
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
}

fn curve(sub: &clap::ArgMatches) -> Result<()> {
    let qi = parse_number(arg_str(sub, "qi")?)?;
    let di = parse_number(arg_str(sub, "di")?)?;
    let b = parse_number(arg_str(sub, "b")?)?;
    let start = parse_date(arg_str(sub, "start")?)?;
    let end = parse_date(arg_str(sub, "end")?)?;
    let q_abnd = match opt_str(sub, "abandonment") {
        Some(s) => parse_number(s)?,
        None => 0.0,
    };

    let profile = build_profile(start, end, qi, di, b, q_abnd);
    let eur = compute_eur(&profile);

    if sub.get_flag("json") {
        let v = json!({ "profile": profile.rows, "eur": eur });
        return maybe_print_json(true, false, &v).map(|_| ());
    }
    if maybe_print_json(false, sub.get_flag("jsonl"), &profile.rows)? {
        return Ok(());
    }
    if profile.is_empty() {
        eprintln!("⚠️ Profile is empty: range is inverted or rate starts below abandonment.");
        return Ok(());
    }
    let data = profile
        .rows
        .iter()
        .map(|r| vec![r.date.to_string(), fmt_rate(r.rate), fmt_rate(r.cumulative)])
        .collect();
    println!("{}", pretty_table(&["Date", "Rate", "Cumulative"], data));
    println!("EUR: {:.2} ({} MM)", eur, fmt_mm(eur));
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repository::CaseStore;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};

/// Findings as `(issue, detail)` pairs, in a stable order.
pub fn check(conn: &Connection) -> Result<Vec<(String, String)>> {
    let store = CaseStore::new(conn);
    let cases = store.load_cases()?;
    let mut rows = Vec::new();

    // 1) Cases pointing at wells missing from the registry (only once wells are registered)
    let wells: BTreeSet<String> = store.list_wells()?.into_iter().map(|w| w.name).collect();
    if !wells.is_empty() {
        let unknown: BTreeSet<&str> = cases
            .iter()
            .map(|c| c.well_name.as_str())
            .filter(|w| !wells.contains(*w))
            .collect();
        for w in unknown {
            rows.push(("case_unknown_well".to_string(), w.to_string()));
        }
    }

    // 2) Parameters that bypassed entry validation
    for c in cases.iter().rev() {
        for (field, v) in [("qi", c.qi), ("di", c.di), ("b", c.b)] {
            if !v.is_finite() || v < 0.0 {
                rows.push((
                    "param_out_of_range".to_string(),
                    format!("case #{} {} = {}", c.case_id, field, v),
                ));
            }
        }
    }

    // 3) Same well, label and effective date entered more than once
    let mut seen: BTreeMap<(&str, &str, String), usize> = BTreeMap::new();
    for c in &cases {
        *seen
            .entry((c.well_name.as_str(), c.case_label.as_str(), c.eff_date.to_string()))
            .or_insert(0) += 1;
    }
    for ((well, label, date), n) in seen {
        if n > 1 {
            rows.push((
                "duplicate_case".to_string(),
                format!("{} / {} @ {} x{}", well, label, date, n),
            ));
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = check(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repository::CaseStore;
use crate::utils::{arg_str, maybe_print_json, opt_str, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = CaseStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg_str(sub, "name")?;
            let field = opt_str(sub, "field");
            let zone = opt_str(sub, "zone");
            let typ = opt_str(sub, "type");
            store.add_well(name, field, zone, typ)?;
            println!(
                "Added well '{}' ({}, {}, {})",
                name,
                field.unwrap_or("-"),
                zone.unwrap_or("-"),
                typ.unwrap_or("-")
            );
        }
        Some(("list", sub)) => {
            let wells = store.list_wells()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wells)? {
                let data = wells
                    .into_iter()
                    .map(|w| {
                        vec![
                            w.name,
                            w.field.unwrap_or_default(),
                            w.zone.unwrap_or_default(),
                            w.well_type.unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Field", "Zone", "Type"], data)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

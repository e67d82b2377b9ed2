// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    DEFAULT_ABANDONMENT_RATE, DEFAULT_END_DATE, SETTING_KEYS, arg_str, get_setting, pretty_table,
    set_setting,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

fn builtin_default(key: &str) -> Option<String> {
    match key {
        "abandonment_rate" => Some(DEFAULT_ABANDONMENT_RATE.to_string()),
        "end_date" => Some(DEFAULT_END_DATE.to_string()),
        _ => None,
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = arg_str(sub, "key")?;
            let value = match get_setting(conn, key)? {
                Some(v) => v,
                None => builtin_default(key).ok_or_else(|| anyhow!("Unknown setting '{}'", key))?,
            };
            println!("{}", value);
        }
        Some(("set", sub)) => {
            let key = arg_str(sub, "key")?;
            let value = arg_str(sub, "value")?;
            set_setting(conn, key, value)?;
            println!("Set {} = {}", key, value);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for key in SETTING_KEYS {
                let (value, source) = match get_setting(conn, key)? {
                    Some(v) => (v, "stored"),
                    None => (builtin_default(key).unwrap_or_default(), "default"),
                };
                data.push(vec![key.to_string(), value, source.to_string()]);
            }
            println!("{}", pretty_table(&["Key", "Value", "Source"], data));
        }
        _ => {}
    }
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use wellcast::{
    cli,
    commands::{config, forecast},
    utils,
};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    wellcast::db::init_schema(&conn).unwrap();
    conn
}

fn run_config(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["wellcast", "config"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("config", config_m)) = matches.subcommand() {
        config::handle(conn, config_m)
    } else {
        panic!("config command not parsed");
    }
}

#[test]
fn defaults_apply_when_nothing_stored() {
    let conn = setup();
    assert_eq!(utils::default_abandonment_rate(&conn).unwrap(), 10.0);
    assert_eq!(
        utils::default_end_date(&conn).unwrap(),
        NaiveDate::from_ymd_opt(2040, 1, 1).unwrap()
    );
}

#[test]
fn config_set_overrides_defaults() {
    let conn = setup();
    run_config(&conn, &["set", "abandonment_rate", " 25.5 "]).unwrap();
    run_config(&conn, &["set", "end_date", "2035-06-30"]).unwrap();
    assert_eq!(utils::default_abandonment_rate(&conn).unwrap(), 25.5);
    assert_eq!(
        utils::default_end_date(&conn).unwrap(),
        NaiveDate::from_ymd_opt(2035, 6, 30).unwrap()
    );
}

#[test]
fn config_set_validates_key_and_value() {
    let conn = setup();
    let err = run_config(&conn, &["set", "base_currency", "USD"]).unwrap_err();
    assert!(err.to_string().contains("Unknown setting 'base_currency'"));

    assert!(run_config(&conn, &["set", "abandonment_rate", "-1"]).is_err());
    assert!(run_config(&conn, &["set", "end_date", "2035-13-01"]).is_err());
    assert_eq!(utils::get_setting(&conn, "abandonment_rate").unwrap(), None);
}

#[test]
fn config_takes_key_and_value_positionally() {
    let conn = setup();
    run_config(&conn, &["get", "abandonment_rate"]).unwrap();
    assert!(run_config(&conn, &["get", "base_currency"]).is_err());

    let matches = cli::build_cli()
        .try_get_matches_from(["wellcast", "config", "set", "abandonment_rate", "-2.5"])
        .unwrap();
    let Some(("config", c)) = matches.subcommand() else {
        panic!("config command not parsed");
    };
    let Some(("set", sub)) = c.subcommand() else {
        panic!("set command not parsed");
    };
    assert_eq!(utils::arg_str(sub, "key").unwrap(), "abandonment_rate");
    assert_eq!(utils::arg_str(sub, "value").unwrap(), "-2.5");

    assert!(
        cli::build_cli()
            .try_get_matches_from(["wellcast", "config", "set", "--key", "end_date"])
            .is_err()
    );
}

#[test]
fn forecast_flags_win_over_settings() {
    let conn = setup();
    utils::set_setting(&conn, "abandonment_rate", "3").unwrap();
    let matches = cli::build_cli().get_matches_from([
        "wellcast", "forecast", "eur", "--label", "Base", "--end", "2030-01-01",
    ]);
    let Some(("forecast", f)) = matches.subcommand() else {
        panic!("forecast command not parsed");
    };
    let Some(("eur", sub)) = f.subcommand() else {
        panic!("eur command not parsed");
    };
    let (end, q) = utils::forecast_params(&conn, sub).unwrap();
    assert_eq!(end, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    assert_eq!(q, 3.0);
}

#[test]
fn curve_accepts_negative_parameters() {
    let conn = setup();
    let matches = cli::build_cli()
        .try_get_matches_from([
            "wellcast",
            "forecast",
            "curve",
            "--qi",
            "10",
            "--di",
            "-0.01",
            "--b",
            "0",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--abandonment",
            "-1",
            "--json",
        ])
        .unwrap();
    let Some(("forecast", f)) = matches.subcommand() else {
        panic!("forecast command not parsed");
    };
    let Some(("curve", sub)) = f.subcommand() else {
        panic!("curve command not parsed");
    };
    assert_eq!(sub.get_one::<String>("di").unwrap(), "-0.01");
    assert_eq!(sub.get_one::<String>("abandonment").unwrap(), "-1");
    forecast::handle(&conn, f).unwrap();

    let eur = cli::build_cli()
        .try_get_matches_from([
            "wellcast", "forecast", "eur", "--label", "Base", "--abandonment", "-5",
        ])
        .unwrap();
    let Some(("forecast", f)) = eur.subcommand() else {
        panic!("forecast command not parsed");
    };
    let Some(("eur", sub)) = f.subcommand() else {
        panic!("eur command not parsed");
    };
    let (_, q) = utils::forecast_params(&conn, sub).unwrap();
    assert_eq!(q, -5.0);
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;
use wellcast::{cli, commands::cases};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    wellcast::db::init_schema(&conn).unwrap();
    conn
}

fn run_import(conn: &Connection, path: &str) {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["wellcast", "case", "import", "--path", path]);
    if let Some(("case", case_m)) = matches.subcommand() {
        cases::handle(conn, case_m).unwrap();
    } else {
        panic!("no case subcommand");
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM forecast_cases", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn import_skips_row_with_blank_well_name() {
    let conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "well_name,case_label,eff_date,qi,di,b\n\
         W1,Base,2024-01-01,100,0.001,0\n\
         ,Base,2024-01-01,100,0.001,0\n\
         W2,Base,2024-02-01,200,0.002,0.5\n\
         W3,Upside,2024-03-01,150,0.001,1"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&conn, file.path().to_str().unwrap());
    assert_eq!(count(&conn), 3);
}

#[test]
fn import_trims_cells_and_path() {
    let conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "well_name,case_label,eff_date,qi,di,b\n  W1  , Base ,2024-01-01, 100 ,0.001,0"
    )
    .unwrap();
    file.flush().unwrap();

    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&conn, &padded);

    let (well, label): (String, String) = conn
        .query_row(
            "SELECT well_name, case_label FROM forecast_cases",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(well, "W1");
    assert_eq!(label, "Base");
}

#[test]
fn import_skips_unparseable_and_incomplete_rows() {
    let conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "well_name,case_label,eff_date,qi,di,b\n\
         W1,Base,2024-13-01,100,0.001,0\n\
         W2,Base,2024-01-01,abc,0.001,0\n\
         W3,Base,2024-01-01,100,,0\n\
         W4,Base,2024-01-01,100,-0.1,0\n\
         W5,Base,2024-01-01,100,0.001,0"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&conn, file.path().to_str().unwrap());
    let well: String = conn
        .query_row("SELECT well_name FROM forecast_cases", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count(&conn), 1);
    assert_eq!(well, "W5");
}

#[test]
fn import_accepts_columns_in_any_order() {
    let conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "b,di,qi,eff_date,case_label,well_name,comment\n0.5,0.002,250,2024-05-01,Base,W9,first fit"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&conn, file.path().to_str().unwrap());
    let (qi, b): (f64, f64) = conn
        .query_row("SELECT qi, b FROM forecast_cases", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(qi, 250.0);
    assert_eq!(b, 0.5);
}

#[test]
fn import_missing_file_is_an_error() {
    let conn = base_conn();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "wellcast",
        "case",
        "import",
        "--path",
        "/nonexistent/cases.csv",
    ]);
    if let Some(("case", case_m)) = matches.subcommand() {
        let err = cases::handle(&conn, case_m).unwrap_err();
        assert!(err.to_string().contains("Open CSV /nonexistent/cases.csv"));
    } else {
        panic!("no case subcommand");
    }
}

#[test]
fn case_add_rejects_blank_label() {
    let conn = base_conn();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "wellcast",
        "case",
        "add",
        "--well",
        "W1",
        "--label",
        "  ",
        "--eff-date",
        "2024-01-01",
        "--qi",
        "100",
        "--di",
        "0.001",
        "--b",
        "0",
    ]);
    if let Some(("case", case_m)) = matches.subcommand() {
        let err = cases::handle(&conn, case_m).unwrap_err();
        assert!(err.to_string().contains("Case rejected"));
    } else {
        panic!("no case subcommand");
    }
    assert_eq!(count(&conn), 0);
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use wellcast::models::NewCase;
use wellcast::repository::{CaseError, CaseStore};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    wellcast::db::init_schema(&conn).unwrap();
    conn
}

fn row(well: &str, label: &str, eff: &str, qi: f64) -> NewCase {
    NewCase {
        well_name: Some(well.to_string()),
        case_label: Some(label.to_string()),
        eff_date: Some(NaiveDate::parse_from_str(eff, "%Y-%m-%d").unwrap()),
        qi: Some(qi),
        di: Some(0.001),
        b: Some(0.5),
    }
}

#[test]
fn batch_skips_blank_well_name() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    let rows = vec![
        row("W1", "Base", "2024-01-01", 100.0),
        row("   ", "Base", "2024-01-01", 100.0),
        row("W2", "Base", "2024-02-01", 200.0),
        row("W3", "Upside", "2024-03-01", 300.0),
    ];
    let inserted = store.insert_cases(&rows).unwrap();
    assert_eq!(inserted, 3);
    assert_eq!(store.count_cases().unwrap(), 3);
}

#[test]
fn batch_skips_rows_missing_required_fields() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    let mut no_b = row("W1", "Base", "2024-01-01", 100.0);
    no_b.b = None;
    let mut no_date = row("W2", "Base", "2024-01-01", 100.0);
    no_date.eff_date = None;
    let rows = vec![no_b, no_date, NewCase::default(), row("W4", "Base", "2024-01-01", 1.0)];
    assert_eq!(store.insert_cases(&rows).unwrap(), 1);
    assert_eq!(store.count_cases().unwrap(), 1);
}

#[test]
fn names_are_trimmed_on_insert() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    store
        .insert_case(&row("  W1  ", " Base ", "2024-01-01", 100.0))
        .unwrap();
    let cases = store.load_cases().unwrap();
    assert_eq!(cases[0].well_name, "W1");
    assert_eq!(cases[0].case_label, "Base");
    assert_eq!(store.labels().unwrap(), vec!["Base".to_string()]);
}

#[test]
fn validation_reports_which_field_failed() {
    let mut r = row("W1", "", "2024-01-01", 100.0);
    assert!(matches!(r.validate(), Err(CaseError::BlankField("case_label"))));

    r = row("W1", "Base", "2024-01-01", -5.0);
    assert!(matches!(
        r.validate(),
        Err(CaseError::InvalidParameter { field: "qi", .. })
    ));

    r = row("W1", "Base", "2024-01-01", 100.0);
    r.di = Some(f64::NAN);
    assert!(matches!(
        r.validate(),
        Err(CaseError::InvalidParameter { field: "di", .. })
    ));

    r.di = None;
    let err = r.validate().unwrap_err();
    assert!(matches!(err, CaseError::MissingField("di")));
    assert_eq!(err.to_string(), "missing required field 'di'");
}

#[test]
fn insert_case_rejects_invalid_row_without_writing() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    let err = store
        .insert_case(&row("", "Base", "2024-01-01", 100.0))
        .unwrap_err();
    assert!(matches!(err, CaseError::BlankField("well_name")));
    assert_eq!(store.count_cases().unwrap(), 0);
}

#[test]
fn cases_load_newest_first_with_id_tiebreak() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    let first = store.insert_case(&row("W1", "Base", "2024-01-01", 1.0)).unwrap();
    let second = store.insert_case(&row("W2", "Base", "2024-06-01", 2.0)).unwrap();
    let third = store.insert_case(&row("W3", "Base", "2024-01-01", 3.0)).unwrap();

    let ids: Vec<i64> = store.load_cases().unwrap().iter().map(|c| c.case_id).collect();
    assert_eq!(ids, vec![second, third, first]);
}

#[test]
fn load_cases_for_filters_by_label() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    store
        .insert_cases(&[
            row("W1", "Base", "2024-01-01", 1.0),
            row("W2", "Upside", "2024-01-01", 2.0),
            row("W3", "Low", "2024-01-01", 3.0),
        ])
        .unwrap();

    let got = store.load_cases_for(&["Upside", "Low"]).unwrap();
    let mut wells: Vec<&str> = got.iter().map(|c| c.well_name.as_str()).collect();
    wells.sort();
    assert_eq!(wells, ["W2", "W3"]);

    let none: [&str; 0] = [];
    assert!(store.load_cases_for(&none).unwrap().is_empty());
}

#[test]
fn stored_parameters_round_trip_exactly() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    let mut r = row("W1", "Base", "2024-02-29", 1234.5678);
    r.di = Some(0.000123);
    r.b = Some(0.0);
    store.insert_case(&r).unwrap();
    let c = &store.load_cases().unwrap()[0];
    assert_eq!(c.eff_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(c.qi, 1234.5678);
    assert_eq!(c.di, 0.000123);
    assert_eq!(c.b, 0.0);
}

#[test]
fn wells_are_unique_and_sorted() {
    let conn = setup();
    let store = CaseStore::new(&conn);
    store.add_well("W2", Some("Alamein"), None, Some("producer")).unwrap();
    store.add_well("W1", None, Some("AEB"), Some("WI")).unwrap();
    assert!(store.add_well("W1", None, None, None).is_err());
    assert!(store.add_well("  ", None, None, None).is_err());

    let wells = store.list_wells().unwrap();
    let names: Vec<&str> = wells.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["W1", "W2"]);
    assert_eq!(wells[1].field.as_deref(), Some("Alamein"));
}

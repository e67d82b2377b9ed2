// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Case store and the case-entry boundary.
//!
//! The forecast engine never touches storage; callers load cases through a
//! [`CaseStore`] and hand the rows over as a plain slice.

use crate::models::{ForecastCase, NewCase, Well};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params, params_from_iter};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{0}' is blank")]
    BlankField(&'static str),
    #[error("invalid {field} '{value}': expected a finite number >= 0")]
    InvalidParameter { field: &'static str, value: f64 },
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

/// A case-entry row that passed validation. Names are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCase {
    pub well_name: String,
    pub case_label: String,
    pub eff_date: NaiveDate,
    pub qi: f64,
    pub di: f64,
    pub b: f64,
}

impl NewCase {
    pub fn validate(&self) -> Result<ValidCase, CaseError> {
        let well_name = self
            .well_name
            .as_deref()
            .ok_or(CaseError::MissingField("well_name"))?;
        let case_label = self
            .case_label
            .as_deref()
            .ok_or(CaseError::MissingField("case_label"))?;
        let eff_date = self.eff_date.ok_or(CaseError::MissingField("eff_date"))?;
        let qi = self.qi.ok_or(CaseError::MissingField("qi"))?;
        let di = self.di.ok_or(CaseError::MissingField("di"))?;
        let b = self.b.ok_or(CaseError::MissingField("b"))?;

        let well_name = well_name.trim();
        if well_name.is_empty() {
            return Err(CaseError::BlankField("well_name"));
        }
        let case_label = case_label.trim();
        if case_label.is_empty() {
            return Err(CaseError::BlankField("case_label"));
        }
        for (field, value) in [("qi", qi), ("di", di), ("b", b)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CaseError::InvalidParameter { field, value });
            }
        }

        Ok(ValidCase {
            well_name: well_name.to_string(),
            case_label: case_label.to_string(),
            eff_date,
            qi,
            di,
            b,
        })
    }
}

const CASE_COLUMNS: &str = "case_id, well_name, case_label, eff_date, qi, di, b";

fn case_from_row(r: &Row<'_>) -> rusqlite::Result<ForecastCase> {
    Ok(ForecastCase {
        case_id: r.get(0)?,
        well_name: r.get(1)?,
        case_label: r.get(2)?,
        eff_date: r.get(3)?,
        qi: r.get(4)?,
        di: r.get(5)?,
        b: r.get(6)?,
    })
}

pub struct CaseStore<'c> {
    conn: &'c Connection,
}

impl<'c> CaseStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// All cases, newest effective date first, later insertions first on ties.
    pub fn load_cases(&self) -> Result<Vec<ForecastCase>> {
        let sql = format!(
            "SELECT {} FROM forecast_cases ORDER BY eff_date DESC, case_id DESC",
            CASE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], case_from_row)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row.context("Invalid row in forecast_cases")?);
        }
        debug!(count = data.len(), "loaded forecast cases");
        Ok(data)
    }

    pub fn load_cases_for<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<ForecastCase>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; labels.len()].join(",");
        let sql = format!(
            "SELECT {} FROM forecast_cases WHERE case_label IN ({}) \
             ORDER BY eff_date DESC, case_id DESC",
            CASE_COLUMNS, placeholders
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(labels.iter().map(|l| l.as_ref())),
            case_from_row,
        )?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row.context("Invalid row in forecast_cases")?);
        }
        Ok(data)
    }

    pub fn labels(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT case_label FROM forecast_cases ORDER BY case_label")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    pub fn count_cases(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM forecast_cases", [], |r| r.get(0))?)
    }

    /// Validate and append one case, returning its id.
    pub fn insert_case(&self, row: &NewCase) -> Result<i64, CaseError> {
        let case = row.validate()?;
        self.conn.execute(
            "INSERT INTO forecast_cases(well_name, case_label, eff_date, qi, di, b) \
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                case.well_name,
                case.case_label,
                case.eff_date,
                case.qi,
                case.di,
                case.b
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append a batch row by row. Rows that fail validation or hit a
    /// database error are logged and skipped; the count of stored rows is
    /// returned.
    pub fn insert_cases(&self, rows: &[NewCase]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin case batch")?;
        let mut count = 0;
        for (idx, row) in rows.iter().enumerate() {
            match self.insert_case(row) {
                Ok(id) => {
                    debug!(row = idx + 1, case_id = id, "inserted case");
                    count += 1;
                }
                Err(err) => warn!(row = idx + 1, "skipping case row: {}", err),
            }
        }
        tx.commit().context("Failed to commit case batch")?;
        Ok(count)
    }

    pub fn add_well(
        &self,
        name: &str,
        field: Option<&str>,
        zone: Option<&str>,
        well_type: Option<&str>,
    ) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Well name must not be blank");
        }
        self.conn
            .execute(
                "INSERT INTO wells(name, field, zone, type) VALUES (?1,?2,?3,?4)",
                params![name, field, zone, well_type],
            )
            .with_context(|| format!("Failed to add well '{}'", name))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_wells(&self) -> Result<Vec<Well>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, field, zone, type FROM wells ORDER BY name")?;
        let rows = stmt.query_map([], |r| {
            Ok(Well {
                id: r.get(0)?,
                name: r.get(1)?,
                field: r.get(2)?,
                zone: r.get(3)?,
                well_type: r.get(4)?,
            })
        })?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }
}

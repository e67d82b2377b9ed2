// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One stored decline-curve fit for one well. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCase {
    pub case_id: i64,
    pub well_name: String,
    pub case_label: String,
    pub eff_date: NaiveDate,
    pub qi: f64,
    pub di: f64, // 1/day
    pub b: f64,
}

/// A case-entry row as typed by a user or read from a CSV file.
/// Nothing here is trusted until `validate` has run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCase {
    pub well_name: Option<String>,
    pub case_label: Option<String>,
    pub eff_date: Option<NaiveDate>,
    pub qi: Option<f64>,
    pub di: Option<f64>,
    pub b: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Well {
    pub id: i64,
    pub name: String,
    pub field: Option<String>,
    pub zone: Option<String>,
    pub well_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub date: NaiveDate,
    pub rate: f64,
    pub cumulative: f64,
}

/// Daily rate profile of one case. Only days at or above the abandonment
/// rate are present, in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastProfile {
    pub rows: Vec<ProfileRow>,
}

impl ForecastProfile {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn rates(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.rate).collect()
    }

    pub fn total(&self) -> f64 {
        self.rows.last().map(|r| r.cumulative).unwrap_or(0.0)
    }
}

/// A profile tagged with the well and case it was built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedProfile {
    pub well_name: String,
    pub case_label: String,
    pub eff_date: NaiveDate,
    pub profile: ForecastProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellEur {
    pub well: String,
    pub case_label: String,
    pub eff_date: NaiveDate,
    pub eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseTotal {
    pub case_label: String,
    pub eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummedRow {
    pub date: NaiveDate,
    pub case_label: String,
    pub rate: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: NaiveDate,
    pub rate: f64,
    pub case_label: String,
    pub well_name: String,
}

/// Where a well first comes online within its label's summed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellAnnotation {
    pub case_label: String,
    pub well_name: String,
    pub date: NaiveDate,
    pub rate: f64,
    pub cumulative: f64,
}

/// Date x label table, one value column per label in `labels` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub labels: Vec<String>,
    pub rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

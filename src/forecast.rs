// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Arps decline-curve engine.
//!
//! Everything in here is a pure function of its arguments. Inputs are not
//! validated: negative or non-finite parameters produce whatever the float
//! arithmetic produces (a hyperbolic base that goes negative under a
//! fractional power yields NaN, for instance). Rows are checked at the
//! case-entry boundary in [`crate::repository`] before they get this far.

use crate::models::{
    CaseTotal, ForecastCase, ForecastProfile, PivotRow, PivotTable, ProfileRow, RawRow,
    SummedRow, TaggedProfile, WellAnnotation, WellEur,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Arps rate at `t` days after the effective date.
///
/// `b == 0` is exponential decline, anything else hyperbolic (harmonic at
/// `b == 1`).
pub fn compute_rate(t: f64, qi: f64, di: f64, b: f64) -> f64 {
    if b == 0.0 {
        qi * (-di * t).exp()
    } else {
        qi / (1.0 + b * di * t).powf(1.0 / b)
    }
}

/// Element-wise [`compute_rate`] over a sequence of elapsed days.
pub fn compute_rates(t: &[f64], qi: f64, di: f64, b: f64) -> Vec<f64> {
    t.iter().map(|&t| compute_rate(t, qi, di, b)).collect()
}

/// Daily profile from `start` to `end` inclusive.
///
/// Every day is tested against `abandonment_rate` on its own; a day below
/// the floor is dropped, not zeroed, and later days are still considered.
/// An inverted range gives an empty profile.
pub fn build_profile(
    start: NaiveDate,
    end: NaiveDate,
    qi: f64,
    di: f64,
    b: f64,
    abandonment_rate: f64,
) -> ForecastProfile {
    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let t: Vec<f64> = dates
        .iter()
        .map(|d| (*d - start).num_days() as f64)
        .collect();
    let rates = compute_rates(&t, qi, di, b);

    let mut rows = Vec::with_capacity(dates.len());
    let mut cumulative = 0.0;
    for (date, rate) in dates.into_iter().zip(rates) {
        if rate < abandonment_rate {
            continue;
        }
        cumulative += rate;
        rows.push(ProfileRow {
            date,
            rate,
            cumulative,
        });
    }
    ForecastProfile { rows }
}

/// Trapezoidal integral of the profile's rate with one-day spacing.
pub fn compute_eur(profile: &ForecastProfile) -> f64 {
    trapezoid(&profile.rates())
}

/// Trapezoid rule with dx = 1. Fewer than two samples integrate to zero.
pub fn trapezoid(samples: &[f64]) -> f64 {
    samples.windows(2).map(|w| (w[0] + w[1]) / 2.0).sum()
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Output of [`aggregate_cases`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub per_well_eur: Vec<WellEur>,
    pub per_case_total: Vec<CaseTotal>,
    pub summed: Vec<SummedRow>,
    pub raw: Vec<TaggedProfile>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.per_well_eur.is_empty() && self.summed.is_empty()
    }

    /// Per-well daily rows, flattened in the order the profiles were built.
    pub fn raw_rows(&self) -> Vec<RawRow> {
        self.raw
            .iter()
            .flat_map(|tp| {
                tp.profile.rows.iter().map(move |r| RawRow {
                    date: r.date,
                    rate: r.rate,
                    case_label: tp.case_label.clone(),
                    well_name: tp.well_name.clone(),
                })
            })
            .collect()
    }

    pub fn summed_for(&self, label: &str) -> Vec<&SummedRow> {
        self.summed.iter().filter(|r| r.case_label == label).collect()
    }

    /// Earliest retained day of each well across all of its profiles under a
    /// label, located on that label's summed curve. Pairs come out in the
    /// order they first appear in `raw`.
    pub fn annotations(&self) -> Vec<WellAnnotation> {
        let mut order: Vec<(&str, &str)> = Vec::new();
        let mut first: BTreeMap<(&str, &str), NaiveDate> = BTreeMap::new();
        for tp in &self.raw {
            let Some(day) = tp.profile.first_date() else {
                continue;
            };
            let key = (tp.case_label.as_str(), tp.well_name.as_str());
            match first.get_mut(&key) {
                Some(d) => *d = (*d).min(day),
                None => {
                    first.insert(key, day);
                    order.push(key);
                }
            }
        }

        let mut out = Vec::new();
        for (label, well) in order {
            let Some(&date) = first.get(&(label, well)) else {
                continue;
            };
            if let Some(row) = self
                .summed
                .iter()
                .find(|r| r.case_label == label && r.date == date)
            {
                out.push(WellAnnotation {
                    case_label: label.to_string(),
                    well_name: well.to_string(),
                    date,
                    rate: row.rate,
                    cumulative: row.cumulative,
                });
            }
        }
        out
    }

    pub fn pivot_rates(&self) -> PivotTable {
        self.pivot(|r| r.rate)
    }

    pub fn pivot_cumulative(&self) -> PivotTable {
        self.pivot(|r| r.cumulative)
    }

    // Columns are sorted by label; labels absent on a date are filled with zero.
    fn pivot(&self, value: impl Fn(&SummedRow) -> f64) -> PivotTable {
        let labels: Vec<String> = self
            .summed
            .iter()
            .map(|r| r.case_label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut grid: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for r in &self.summed {
            let col = labels
                .iter()
                .position(|l| *l == r.case_label)
                .unwrap_or_default();
            grid.entry(r.date).or_insert_with(|| vec![0.0; labels.len()])[col] = value(r);
        }
        PivotTable {
            labels,
            rows: grid
                .into_iter()
                .map(|(date, values)| PivotRow { date, values })
                .collect(),
        }
    }
}

/// Build, integrate and sum the profiles of every case whose label is
/// selected.
///
/// Labels are processed in selection order (duplicates once), cases in the
/// order given. Per-well EUR is rounded to 2dp and the per-label totals are
/// sums of those rounded values, sorted by label. The summed series of a
/// label is the date-union of its wells' profiles with absent wells
/// contributing nothing, followed by a running cumulative.
pub fn aggregate_cases<S: AsRef<str>>(
    cases: &[ForecastCase],
    labels: &[S],
    end_date: NaiveDate,
    abandonment_rate: f64,
) -> Aggregation {
    let mut selected: Vec<&str> = Vec::new();
    for l in labels {
        if !selected.contains(&l.as_ref()) {
            selected.push(l.as_ref());
        }
    }

    let mut agg = Aggregation::default();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for label in selected {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut wells = 0usize;

        for case in cases.iter().filter(|c| c.case_label == label) {
            wells += 1;
            let profile = build_profile(
                case.eff_date,
                end_date,
                case.qi,
                case.di,
                case.b,
                abandonment_rate,
            );
            let eur = round2(compute_eur(&profile));
            *totals.entry(label.to_string()).or_insert(0.0) += eur;

            for row in &profile.rows {
                *by_date.entry(row.date).or_insert(0.0) += row.rate;
            }

            agg.per_well_eur.push(WellEur {
                well: case.well_name.clone(),
                case_label: label.to_string(),
                eff_date: case.eff_date,
                eur,
            });
            agg.raw.push(TaggedProfile {
                well_name: case.well_name.clone(),
                case_label: label.to_string(),
                eff_date: case.eff_date,
                profile,
            });
        }

        debug!(label, wells, days = by_date.len(), "aggregated case label");

        let mut cumulative = 0.0;
        for (date, rate) in by_date {
            cumulative += rate;
            agg.summed.push(SummedRow {
                date,
                case_label: label.to_string(),
                rate,
                cumulative,
            });
        }
    }

    agg.per_case_total = totals
        .into_iter()
        .map(|(case_label, eur)| CaseTotal { case_label, eur })
        .collect();
    agg
}

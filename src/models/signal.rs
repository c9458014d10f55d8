use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A value observed per (date, site display name), spanning multiple years.
///
/// One scalar per reading: absolute humidity, or a pre-normalized
/// incidence-excess rate supplied by an external loader. Feb 29 readings are
/// excluded by the loader (contract, not enforced here).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SignalTable {
    values: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl SignalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, site: impl Into<String>, value: f64) {
        self.values.entry(date).or_default().insert(site.into(), value);
    }

    pub fn get(&self, date: NaiveDate, site: &str) -> Option<f64> {
        self.values.get(&date).and_then(|row| row.get(site)).copied()
    }

    /// Iterate rows in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &HashMap<String, f64>)> {
        self.values.iter().map(|(date, row)| (*date, row))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Same shape as [`SignalTable`]: observed value minus its climatological
/// baseline for that calendar day and site.
pub type DeviationTable = SignalTable;

/// One reading of a baseline-relative incidence/mortality metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcessPoint {
    pub date: NaiveDate,
    pub excess: f64,
}

/// Chronologically ordered excess readings for one site.
pub type ExcessSeries = Vec<ExcessPoint>;

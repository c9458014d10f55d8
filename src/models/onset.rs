use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An excess threshold usable as an ordered map key.
///
/// f64 has no `Eq`/`Ord`/`Hash`, so equality and hashing go through the bit
/// pattern and ordering through `total_cmp`. Thresholds are plain finite
/// study parameters, so NaN subtleties never arise in practice.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Threshold {}

impl Hash for Threshold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confirmed outbreak onsets: threshold → site code → chronologically
/// ordered, deduplicated onset dates.
///
/// The detector guarantees that no two dates for the same (threshold, site)
/// are closer than the configured refractory gap.
#[derive(Debug, Clone, Default)]
pub struct OnsetSet {
    onsets: BTreeMap<Threshold, BTreeMap<String, Vec<NaiveDate>>>,
}

impl OnsetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, threshold: Threshold, site: impl Into<String>, date: NaiveDate) {
        self.onsets
            .entry(threshold)
            .or_default()
            .entry(site.into())
            .or_default()
            .push(date);
    }

    /// Make sure a threshold key exists even when no onset was confirmed
    /// under it. Downstream consumers distinguish "threshold examined, zero
    /// onsets" from "threshold never examined".
    pub fn ensure_threshold(&mut self, threshold: Threshold) {
        self.onsets.entry(threshold).or_default();
    }

    pub fn thresholds(&self) -> impl Iterator<Item = Threshold> + '_ {
        self.onsets.keys().copied()
    }

    pub fn sites(&self, threshold: Threshold) -> impl Iterator<Item = &str> {
        self.onsets
            .get(&threshold)
            .into_iter()
            .flat_map(|by_site| by_site.keys().map(String::as_str))
    }

    pub fn dates(&self, threshold: Threshold, site: &str) -> &[NaiveDate] {
        self.onsets
            .get(&threshold)
            .and_then(|by_site| by_site.get(site))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn last_onset(&self, threshold: Threshold, site: &str) -> Option<NaiveDate> {
        self.dates(threshold, site).last().copied()
    }

    /// Total onset count across all sites under one threshold.
    pub fn count(&self, threshold: Threshold) -> usize {
        self.onsets
            .get(&threshold)
            .map(|by_site| by_site.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn records_accumulate_per_threshold_and_site() {
        let mut set = OnsetSet::new();
        let t = Threshold::new(5.0);
        set.record(t, "spb", d(1990, 12, 10));
        set.record(t, "spb", d(1992, 1, 3));
        set.record(t, "msk", d(1991, 2, 1));

        assert_eq!(set.dates(t, "spb"), &[d(1990, 12, 10), d(1992, 1, 3)]);
        assert_eq!(set.count(t), 3);
        assert_eq!(set.last_onset(t, "spb"), Some(d(1992, 1, 3)));
        assert_eq!(set.count(Threshold::new(10.0)), 0);
    }

    #[test]
    fn thresholds_iterate_in_ascending_order() {
        let mut set = OnsetSet::new();
        for t in [10.0, 0.5, 5.0] {
            set.ensure_threshold(Threshold::new(t));
        }
        let order: Vec<f64> = set.thresholds().map(|t| t.value()).collect();
        assert_eq!(order, vec![0.5, 5.0, 10.0]);
    }
}

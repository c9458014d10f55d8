use std::collections::BTreeMap;

use crate::domain::WinterWindow;
use crate::models::onset::{OnsetSet, Threshold};

/// Per-threshold elementwise mean of onset-aligned deviation windows.
///
/// Every curve has the same length as the offset axis it was built against,
/// regardless of how many onsets contributed to it.
#[derive(Debug, Clone, Default)]
pub struct AverageCurve {
    curves: BTreeMap<Threshold, Vec<f64>>,
}

impl AverageCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, threshold: Threshold, curve: Vec<f64>) {
        self.curves.insert(threshold, curve);
    }

    pub fn get(&self, threshold: Threshold) -> Option<&[f64]> {
        self.curves.get(&threshold).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Threshold, &[f64])> {
        self.curves.iter().map(|(t, c)| (*t, c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// Onset counts bucketed by winter-day index, for external rendering.
///
/// The returned vector always has `window.days_count()` buckets. Onsets whose
/// dates cannot be indexed into the window are skipped with a warning; they
/// indicate a detector configured with a different window than the histogram.
pub fn onset_day_histogram(
    onsets: &OnsetSet,
    threshold: Threshold,
    window: &WinterWindow,
) -> Vec<usize> {
    let mut buckets = vec![0usize; window.days_count() as usize];
    let sites: Vec<String> = onsets.sites(threshold).map(str::to_string).collect();
    for site in &sites {
        for &date in onsets.dates(threshold, site) {
            match window.day_index(date) {
                Ok(idx) => buckets[idx] += 1,
                Err(err) => log::warn!("onset for site '{site}' skipped in histogram: {err}"),
            }
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn histogram_counts_onsets_per_window_day() {
        let window = WinterWindow::december_to_february();
        let t = Threshold::new(5.0);
        let mut onsets = OnsetSet::new();
        onsets.record(t, "a", d(1990, 12, 1)); // index 0
        onsets.record(t, "a", d(1995, 12, 1)); // index 0 again, other year
        onsets.record(t, "b", d(1991, 1, 1)); // index 31

        let hist = onset_day_histogram(&onsets, t, &window);
        assert_eq!(hist.len(), window.days_count() as usize);
        assert_eq!(hist[0], 2);
        assert_eq!(hist[31], 1);
        assert_eq!(hist.iter().sum::<usize>(), 3);
    }

    #[test]
    fn out_of_window_onsets_are_skipped() {
        let window = WinterWindow::december_to_february();
        let t = Threshold::new(0.0);
        let mut onsets = OnsetSet::new();
        onsets.record(t, "a", d(1990, 7, 1));

        let hist = onset_day_histogram(&onsets, t, &window);
        assert_eq!(hist.iter().sum::<usize>(), 0);
    }
}

use std::collections::{BTreeMap, HashMap};

use crate::domain::CalendarDay;
use crate::error::{AnalysisError, Result};
use crate::models::{DeviationTable, SignalTable};

/// Climatological baseline: calendar day → site → mean value across all
/// observed years sharing that calendar day.
///
/// Built only from readings for the same calendar day; months never mix.
/// Feb 29 never appears because leap-day readings are excluded upstream.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    means: BTreeMap<CalendarDay, HashMap<String, f64>>,
}

impl Baseline {
    pub fn get(&self, day: CalendarDay, site: &str) -> Option<f64> {
        self.means.get(&day).and_then(|row| row.get(site)).copied()
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.means.keys().copied()
    }

    /// Calendar-ordered mean series for one site, for external rendering of
    /// the annual climatology.
    pub fn site_series(&self, site: &str) -> Vec<f64> {
        self.means
            .values()
            .filter_map(|row| row.get(site))
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// Group all (date, site, value) readings by calendar day, accumulate
/// sum/count per (calendar day, site), divide.
pub fn compute_baseline(signal: &SignalTable) -> Baseline {
    let mut sums: BTreeMap<CalendarDay, HashMap<String, (f64, usize)>> = BTreeMap::new();

    for (date, row) in signal.iter() {
        let day = CalendarDay::from_date(date);
        let per_site = sums.entry(day).or_default();
        for (site, &value) in row {
            let (sum, count) = per_site.entry(site.clone()).or_insert((0.0, 0));
            *sum += value;
            *count += 1;
        }
    }

    let means = sums
        .into_iter()
        .map(|(day, per_site)| {
            let row = per_site
                .into_iter()
                .map(|(site, (sum, count))| (site, sum / count as f64))
                .collect();
            (day, row)
        })
        .collect();

    Baseline { means }
}

/// Elementwise subtraction keyed by calendar day:
/// `deviation[date][site] = signal[date][site] − baseline[calendar_day(date)][site]`.
///
/// Fails fast with [`AnalysisError::MissingBaselineKey`] when a (calendar
/// day, site) pair present in the signal has no baseline entry, since a
/// partial deviation table would corrupt every downstream statistic.
pub fn compute_deviation(signal: &SignalTable, baseline: &Baseline) -> Result<DeviationTable> {
    let mut deviation = DeviationTable::new();

    for (date, row) in signal.iter() {
        let day = CalendarDay::from_date(date);
        for (site, &value) in row {
            let mean =
                baseline
                    .get(day, site)
                    .ok_or_else(|| AnalysisError::MissingBaselineKey {
                        date,
                        site: site.clone(),
                    })?;
            deviation.insert(date, site.clone(), value - mean);
        }
    }

    Ok(deviation)
}

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::WinterWindow;
use crate::error::{AnalysisError, Result};
use crate::models::{ExcessSeries, OnsetSet, Threshold};

/// Per-call detector configuration. Explicit and immutable: nothing here is
/// shared between independent detector invocations.
#[derive(Debug, Clone)]
pub struct OnsetConfig {
    /// Excess thresholds to scan for, each examined independently.
    pub thresholds: Vec<f64>,
    /// Season gate: onsets are only confirmed inside this window.
    pub window: WinterWindow,
    /// Overall valid calendar range. Dates on or before `earliest` or on or
    /// after `latest` are skipped, guarding against baseline edge artifacts
    /// at the dataset's first and last seasons.
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    /// Refractory gap: minimum days between consecutive onsets for one
    /// (threshold, site). `None` defaults to the window length, matching the
    /// original conflation of season length and debounce gap.
    pub min_gap_days: Option<i64>,
}

impl OnsetConfig {
    fn validate(&self) -> Result<()> {
        if self.thresholds.is_empty() {
            return Err(AnalysisError::configuration("empty threshold list"));
        }
        if self.earliest >= self.latest {
            return Err(AnalysisError::configuration(format!(
                "valid range is empty: earliest {} >= latest {}",
                self.earliest, self.latest
            )));
        }
        if let Some(gap) = self.min_gap_days
            && gap <= 0
        {
            return Err(AnalysisError::configuration(format!(
                "refractory gap must be positive, got {gap}"
            )));
        }
        Ok(())
    }

    fn effective_gap_days(&self) -> i64 {
        self.min_gap_days.unwrap_or_else(|| self.window.days_count())
    }
}

/// Scan per-site excess series and emit confirmed onsets per threshold.
///
/// The 3-point sliding test at index i ≥ 2: confirm an onset at the current
/// date when both predecessors are at or above the threshold and the current
/// date passes the season gate. A confirmed onset is then suppressed if the
/// most recent onset for the same (threshold, site) is closer than the
/// refractory gap. Purely causal, deterministic, independent per threshold
/// and per site.
pub fn detect_onsets(
    excess: &HashMap<String, ExcessSeries>,
    config: &OnsetConfig,
) -> Result<OnsetSet> {
    config.validate()?;
    let gap_days = config.effective_gap_days();

    let mut onsets = OnsetSet::new();
    // Deterministic site order regardless of map iteration order.
    let mut site_codes: Vec<&str> = excess.keys().map(String::as_str).collect();
    site_codes.sort_unstable();

    for &raw_threshold in &config.thresholds {
        let threshold = Threshold::new(raw_threshold);
        onsets.ensure_threshold(threshold);

        for &site in &site_codes {
            let series = &excess[site];
            for i in 2..series.len() {
                let (prev2, prev1, current) = (&series[i - 2], &series[i - 1], &series[i]);

                if current.date <= config.earliest || current.date >= config.latest {
                    continue;
                }
                if prev2.excess < raw_threshold || prev1.excess < raw_threshold {
                    continue;
                }
                if !config.window.is_within(current.date) {
                    continue;
                }
                // Refractory filter: cut off a second epidemic in the same season.
                if let Some(last) = onsets.last_onset(threshold, site)
                    && (current.date - last).num_days() < gap_days
                {
                    continue;
                }
                onsets.record(threshold, site, current.date);
            }
        }

        log::info!(
            "found {} epidemics for threshold {}",
            onsets.count(threshold),
            raw_threshold
        );
    }

    Ok(onsets)
}

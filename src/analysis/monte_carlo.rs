use chrono::Duration;
use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::study::{CHECKPOINT_INTERVAL, CONTROL_SAMPLE_SIZE, INTERVAL_LENGTH_DAYS};
use crate::data::SampleStore;
use crate::domain::calendar::retreat_from_leap_day;
use crate::domain::{SiteResolver, WinterWindow};
use crate::error::{AnalysisError, Result};
use crate::models::{DeviationTable, OnsetSet, Threshold};

/// Per-call Monte-Carlo configuration.
///
/// The study constants are the defaults; tests shrink them. `years` is the
/// pool of seasons the control generator draws from, which should exclude
/// the baseline edge years.
#[derive(Debug, Clone)]
pub struct MonteCarloConfig {
    pub interval_length_days: i64,
    pub control_sample_size: usize,
    pub checkpoint_interval: usize,
    pub years: Vec<i32>,
}

impl MonteCarloConfig {
    pub fn with_years(years: Vec<i32>) -> Self {
        Self {
            interval_length_days: INTERVAL_LENGTH_DAYS,
            control_sample_size: CONTROL_SAMPLE_SIZE,
            checkpoint_interval: CHECKPOINT_INTERVAL,
            years,
        }
    }

    fn validate(&self, window: &WinterWindow) -> Result<()> {
        if self.years.is_empty() {
            return Err(AnalysisError::configuration("empty year pool"));
        }
        self.validate_intervals()?;
        // Fail fast on a window start that does not exist in a pool year,
        // instead of aborting trials one by one later.
        for &year in &self.years {
            window.start_in_year(year)?;
        }
        Ok(())
    }

    /// The subset of checks that apply to both generators; the experimental
    /// generator never draws from the year pool, so it validates only these.
    fn validate_intervals(&self) -> Result<()> {
        if self.interval_length_days <= 0 {
            return Err(AnalysisError::configuration(format!(
                "interval length must be positive, got {}",
                self.interval_length_days
            )));
        }
        if self.checkpoint_interval == 0 {
            return Err(AnalysisError::configuration(
                "checkpoint interval must be positive",
            ));
        }
        Ok(())
    }
}

/// Resolve site codes to table keys up front so an unknown code fails the
/// run before any sampling happens.
fn resolve_names(sites: &[String], resolver: &SiteResolver) -> Result<Vec<String>> {
    if sites.is_empty() {
        return Err(AnalysisError::configuration("empty site list"));
    }
    sites
        .iter()
        .map(|code| resolver.display_name(code).map(str::to_string))
        .collect()
}

/// Mean deviation over `length` consecutive days starting at `start`
/// (leap days retreat to Feb 28 before lookup).
fn interval_mean(
    deviations: &DeviationTable,
    site_name: &str,
    start: chrono::NaiveDate,
    length: i64,
    step: i64,
) -> Result<f64> {
    let mut sum = 0.0;
    for j in 0..length {
        let date = retreat_from_leap_day(start + Duration::days(j * step));
        let value = deviations
            .get(date, site_name)
            .ok_or_else(|| AnalysisError::MissingData {
                date,
                site: site_name.to_string(),
            })?;
        sum += value;
    }
    Ok(sum / length as f64)
}

/// One control trial: draw `onset_count` random (site, year, window-day)
/// triples, compute each interval mean, average the means into one scalar.
fn control_trial(
    onset_count: usize,
    deviations: &DeviationTable,
    window: &WinterWindow,
    site_names: &[String],
    config: &MonteCarloConfig,
) -> Result<f64> {
    let mut rng = rand::thread_rng();
    let mut sum_of_means = 0.0;

    for _ in 0..onset_count {
        let site_name = &site_names[rng.gen_range(0..site_names.len())];
        let year = config.years[rng.gen_range(0..config.years.len())];
        let day_idx = rng.gen_range(0..window.days_count());
        let start = window.start_in_year(year)? + Duration::days(day_idx);
        sum_of_means +=
            interval_mean(deviations, site_name, start, config.interval_length_days, 1)?;
    }

    Ok(sum_of_means / onset_count as f64)
}

fn log_sample_summary(label: &str, samples: &[f64]) {
    if samples.is_empty() {
        return;
    }
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = samples.iter().sum::<f64>() / samples.len() as f64;
    log::info!("{label}: {} values, min {min}, avg {avg}, max {max}", samples.len());
}

/// Generate the null distribution: `control_sample_size` independent trials
/// of randomly placed interval means.
///
/// Iterations within one checkpoint interval run in parallel and are merged
/// by append; the store's iteration cursor makes an interrupted or resumed
/// run idempotent. A trial that hits a data gap is aborted and logged (it
/// advances the cursor without contributing a scalar) rather than padded
/// with a default, which would bias the null distribution. The cancel flag
/// is checked once per checkpoint interval.
pub fn control_sample(
    onset_count: usize,
    deviations: &DeviationTable,
    window: &WinterWindow,
    sites: &[String],
    resolver: &SiteResolver,
    config: &MonteCarloConfig,
    store: &SampleStore,
    cancel: &AtomicBool,
) -> Result<Vec<f64>> {
    config.validate(window)?;
    if onset_count == 0 {
        return Err(AnalysisError::not_computable(
            "no onsets to size the control trials",
        ));
    }
    let site_names = resolve_names(sites, resolver)?;

    let mut state = store.load()?;
    if state.completed_iterations > 0 {
        log::info!(
            "resuming control sampling at iteration {} ({} scalars already persisted)",
            state.completed_iterations,
            state.samples.len()
        );
    }

    while state.completed_iterations < config.control_sample_size {
        if cancel.load(Ordering::Relaxed) {
            log::warn!(
                "control sampling cancelled after {} iterations",
                state.completed_iterations
            );
            break;
        }

        let remaining = config.control_sample_size - state.completed_iterations;
        let chunk = remaining.min(config.checkpoint_interval);

        let new_samples: Vec<f64> = (0..chunk)
            .into_par_iter()
            .filter_map(|_| {
                match control_trial(onset_count, deviations, window, &site_names, config) {
                    Ok(scalar) => Some(scalar),
                    Err(err) => {
                        log::warn!("control trial aborted: {err}");
                        None
                    }
                }
            })
            .collect();

        state = store.append(&new_samples, chunk)?;
        log::info!(
            "{} %",
            100 * state.completed_iterations / config.control_sample_size
        );
        log_sample_summary("control", &state.samples);
    }

    Ok(state.samples)
}

/// Generate the onset-aligned distribution: for every real onset under the
/// threshold, the mean deviation over the `interval_length_days` days ending
/// at (inclusive of) the onset date.
///
/// A data gap here is fatal: the experimental sample must cover exactly the
/// intended onsets or the comparison is meaningless. Checkpoints follow the
/// same cursor semantics as the control generator, so a resumed run skips
/// the onsets already persisted.
pub fn experimental_sample(
    onsets: &OnsetSet,
    threshold: Threshold,
    deviations: &DeviationTable,
    sites: &[String],
    resolver: &SiteResolver,
    config: &MonteCarloConfig,
    store: &SampleStore,
) -> Result<Vec<f64>> {
    config.validate_intervals()?;
    let site_names = resolve_names(sites, resolver)?;
    if onsets.count(threshold) == 0 {
        return Err(AnalysisError::not_computable(format!(
            "no onsets recorded for threshold {threshold}"
        )));
    }

    let mut state = store.load()?;
    let mut pending: Vec<f64> = Vec::new();
    let mut seen = 0usize;

    for (site, site_name) in sites.iter().zip(&site_names) {
        for &onset in onsets.dates(threshold, site) {
            seen += 1;
            if seen <= state.completed_iterations {
                continue; // already persisted by an earlier run
            }
            // Walk backwards from the onset, inclusive.
            pending.push(interval_mean(
                deviations,
                site_name,
                onset,
                config.interval_length_days,
                -1,
            )?);

            if pending.len() >= config.checkpoint_interval {
                state = store.append(&pending, pending.len())?;
                pending.clear();
            }
        }
    }

    if !pending.is_empty() {
        state = store.append(&pending, pending.len())?;
    }

    log_sample_summary("onset-prior experimental", &state.samples);
    Ok(state.samples)
}

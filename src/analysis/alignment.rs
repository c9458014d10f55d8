use chrono::Duration;
use itertools::Itertools;

use crate::config::study::default_day_shift_range;
use crate::domain::calendar::dodge_forward;
use crate::domain::site::SiteResolver;
use crate::error::{AnalysisError, Result};
use crate::models::{AverageCurve, DeviationTable, OnsetSet, Threshold};

/// Per-call alignment configuration.
#[derive(Debug, Clone)]
pub struct AlignmentConfig {
    /// Ordered day offsets relative to each onset, e.g. −42..=+28.
    pub day_offsets: Vec<i64>,
    /// Months whose lookups advance one day to dodge known data gaps in the
    /// source tables. The original study needed this for the spring months.
    pub gap_dodge_months: Vec<u32>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            day_offsets: default_day_shift_range(),
            gap_dodge_months: vec![3, 4, 5],
        }
    }
}

/// Build the elementwise-mean anomaly curve for one threshold.
///
/// Every onset under the threshold contributes one aligned sample: the
/// deviation value at `onset + offset` for every offset in order, with the
/// Feb-29/gap-month forward shift applied before lookup. A missing deviation
/// entry aborts the whole curve with [`AnalysisError::MissingData`] rather
/// than silently shortening it — a partial curve would misrepresent the
/// average. Zero onsets also fail, with [`AnalysisError::NotComputable`],
/// instead of producing an empty or NaN curve.
pub fn threshold_curve(
    onsets: &OnsetSet,
    threshold: Threshold,
    deviations: &DeviationTable,
    sites: &[String],
    resolver: &SiteResolver,
    config: &AlignmentConfig,
) -> Result<Vec<f64>> {
    if config.day_offsets.is_empty() {
        return Err(AnalysisError::configuration("empty day-offset range"));
    }

    let mut sums = vec![0.0; config.day_offsets.len()];
    let mut sample_count = 0usize;

    for site in sites {
        let site_name = resolver.display_name(site)?;

        for &onset in onsets.dates(threshold, site) {
            for (slot, &shift) in config.day_offsets.iter().enumerate() {
                let date = dodge_forward(onset + Duration::days(shift), &config.gap_dodge_months);
                let value =
                    deviations
                        .get(date, site_name)
                        .ok_or_else(|| AnalysisError::MissingData {
                            date,
                            site: site_name.to_string(),
                        })?;
                sums[slot] += value;
            }
            sample_count += 1;
        }
    }

    if sample_count == 0 {
        return Err(AnalysisError::not_computable(format!(
            "no onsets recorded for threshold {threshold}"
        )));
    }

    Ok(sums
        .into_iter()
        .map(|sum| sum / sample_count as f64)
        .collect())
}

/// Build average anomaly curves for every threshold in the onset set.
///
/// A threshold whose curve cannot be computed aborts only that threshold:
/// the failure is logged and the remaining thresholds still produce curves.
pub fn average_deviation_curves(
    onsets: &OnsetSet,
    deviations: &DeviationTable,
    sites: &[String],
    resolver: &SiteResolver,
    config: &AlignmentConfig,
) -> Result<AverageCurve> {
    let mut curves = AverageCurve::new();

    for threshold in onsets.thresholds().collect::<Vec<_>>() {
        let dates = sites
            .iter()
            .flat_map(|site| onsets.dates(threshold, site))
            .map(|date| date.format("%d.%m.%Y").to_string())
            .join(", ");
        log::info!(
            "aligning {} onsets for threshold {}: [{dates}]",
            onsets.count(threshold),
            threshold
        );
        match threshold_curve(onsets, threshold, deviations, sites, resolver, config) {
            Ok(curve) => curves.insert(threshold, curve),
            Err(err @ AnalysisError::Configuration { .. }) => return Err(err),
            Err(err) => {
                log::error!("threshold {threshold} aborted: {err}");
            }
        }
    }

    Ok(curves)
}

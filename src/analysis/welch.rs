use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{AnalysisError, Result};

/// Outcome of a Welch unequal-variance t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchResult {
    /// The t-statistic (first sample mean minus second sample mean).
    pub t: f64,
    /// Two-tailed p-value.
    pub p: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (n − 1 denominator).
fn sample_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Welch's two-sample t-test for difference of means without assuming equal
/// variances.
///
/// Degenerate inputs — fewer than two values on either side, or zero variance
/// on both sides — return [`AnalysisError::NotComputable`] instead of letting
/// a NaN propagate into the caller's report.
pub fn welch_t_test(first: &[f64], second: &[f64]) -> Result<WelchResult> {
    if first.len() < 2 || second.len() < 2 {
        return Err(AnalysisError::not_computable(format!(
            "need at least two values per sample, got {} and {}",
            first.len(),
            second.len()
        )));
    }

    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let (m1, m2) = (mean(first), mean(second));
    let (v1, v2) = (sample_variance(first, m1), sample_variance(second, m2));

    let standard_error_sq = v1 / n1 + v2 / n2;
    if standard_error_sq <= 0.0 {
        return Err(AnalysisError::not_computable(
            "both samples have zero variance",
        ));
    }

    let t = (m1 - m2) / standard_error_sq.sqrt();
    let degrees_of_freedom = standard_error_sq.powi(2)
        / ((v1 / n1).powi(2) / (n1 - 1.0) + (v2 / n2).powi(2) / (n2 - 1.0));

    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|err| {
        AnalysisError::not_computable(format!(
            "invalid Student's t parameters (df = {degrees_of_freedom}): {err}"
        ))
    })?;
    let p = 2.0 * (1.0 - dist.cdf(t.abs()));

    Ok(WelchResult {
        t,
        p,
        degrees_of_freedom,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hand_computed_fixture() {
        // Classic unequal-variance fixture; reference values computed with
        // scipy.stats.ttest_ind(equal_var=False).
        let a = [27.5, 21.0, 19.0, 23.6, 17.0, 17.9, 16.9, 20.1, 21.9, 22.6, 23.1, 19.6, 19.0, 21.7, 21.4];
        let b = [27.1, 22.0, 20.8, 23.4, 23.4, 23.5, 25.8, 22.0, 24.8, 20.2, 21.9, 22.1, 22.9, 30.0, 23.9];

        let result = welch_t_test(&a, &b).unwrap();
        assert!((result.t - (-2.83526)).abs() < 1e-4, "t = {}", result.t);
        assert!((result.degrees_of_freedom - 27.7136).abs() < 1e-3);
        assert!((result.p - 0.008453).abs() < 1e-5, "p = {}", result.p);
    }

    #[test]
    fn identical_samples_give_zero_t_and_p_near_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let result = welch_t_test(&a, &a).unwrap();
        assert_eq!(result.t, 0.0);
        assert!((result.p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_on_both_sides_is_not_computable() {
        let zeros = [0.0; 16];
        assert!(matches!(
            welch_t_test(&zeros, &zeros[..4]),
            Err(AnalysisError::NotComputable { .. })
        ));
    }

    #[test]
    fn single_value_samples_are_not_computable() {
        assert!(matches!(
            welch_t_test(&[1.0], &[1.0, 2.0]),
            Err(AnalysisError::NotComputable { .. })
        ));
    }

    #[test]
    fn zero_variance_on_one_side_still_computes() {
        let flat = [5.0, 5.0, 5.0, 5.0];
        let spread = [1.0, 2.0, 3.0, 4.0];
        let result = welch_t_test(&flat, &spread).unwrap();
        assert!(result.t > 0.0);
        assert!(result.p > 0.0 && result.p < 1.0);
    }
}

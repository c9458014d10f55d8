use chrono::NaiveDate;

/// Failure modes of the analysis pipeline.
///
/// Every variant carries enough context (date, site) to locate the offending
/// table entry without re-running the computation.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    /// A caller-supplied configuration value is unusable.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// A (calendar day, site) pair present in the signal has no baseline
    /// entry, so no deviation can be formed for it.
    #[error("no baseline entry for {date} at site '{site}'")]
    MissingBaselineKey { date: NaiveDate, site: String },

    /// A date does not map into the winter window.
    #[error("{date} is outside the window")]
    OutOfRange { date: NaiveDate },

    /// A lookup hit a gap in the deviation tables.
    #[error("no data for {date} at site '{site}'")]
    MissingData { date: NaiveDate, site: String },

    /// The requested statistic has no defined value for these inputs.
    /// Surfaces instead of NaN so the condition cannot propagate silently.
    #[error("not computable: {reason}")]
    NotComputable { reason: String },

    /// Sample-store I/O or serialization failure.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn not_computable(reason: impl Into<String>) -> Self {
        Self::NotComputable {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_date_and_site_context() {
        let err = AnalysisError::MissingData {
            date: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            site: "Xville".to_string(),
        };
        assert_eq!(err.to_string(), "no data for 1990-12-10 at site 'Xville'");

        let err = AnalysisError::configuration("empty year pool");
        assert_eq!(err.to_string(), "invalid configuration: empty year pool");
    }

    #[test]
    fn store_errors_convert_from_anyhow() {
        fn load() -> Result<()> {
            let inner: anyhow::Result<()> = Err(anyhow::anyhow!("corrupt sample file"));
            inner?;
            Ok(())
        }
        assert!(matches!(load(), Err(AnalysisError::Store(_))));
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Display metadata for one observation site (a city or a state).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    /// Full display name, e.g. "Saint Petersburg". Signal and deviation
    /// tables are keyed by this name.
    pub name: String,
    /// Short code, e.g. "SPB".
    pub acronym: String,
}

/// Injected mapping from internal site codes to display metadata.
///
/// The resolver is static configuration supplied by the caller; the core
/// never computes it.
#[derive(Debug, Clone, Default)]
pub struct SiteResolver {
    entries: HashMap<String, SiteInfo>,
}

impl SiteResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, SiteInfo)>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, info)| (code.into(), info))
                .collect(),
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, info: SiteInfo) {
        self.entries.insert(code.into(), info);
    }

    /// Resolve a site code to the display name used as a table key.
    pub fn display_name(&self, code: &str) -> Result<&str> {
        self.entries
            .get(code)
            .map(|info| info.name.as_str())
            .ok_or_else(|| {
                AnalysisError::configuration(format!("unknown site code '{code}' in resolver"))
            })
    }

    pub fn get(&self, code: &str) -> Option<&SiteInfo> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_codes() {
        let resolver = SiteResolver::from_entries([(
            "spb",
            SiteInfo {
                name: "Saint Petersburg".to_string(),
                acronym: "SPB".to_string(),
            },
        )]);
        assert_eq!(resolver.display_name("spb").unwrap(), "Saint Petersburg");
    }

    #[test]
    fn unknown_code_is_a_configuration_error() {
        let resolver = SiteResolver::new();
        assert!(matches!(
            resolver.display_name("msk"),
            Err(AnalysisError::Configuration { .. })
        ));
    }
}

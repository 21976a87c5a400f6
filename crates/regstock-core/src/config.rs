//! Analysis settings: in-force strategy, classifier text window and the
//! exclusion categories applied before aggregation.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tables::{CIVIL_AVIATION, TARIFF_CONCESSION};
use crate::{ClassifierTables, CoreError, InForceStrategy};

/// Characters of body text the industry classifier reads.
pub const DEFAULT_TEXT_WINDOW: usize = 3000;
pub const TEXT_WINDOW_RANGE: RangeInclusive<usize> = 2000..=5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub strategy: InForceStrategy,
    pub text_window: usize,
    /// Exclusion category names to apply. Must exist in the classifier tables.
    pub excluded_categories: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: InForceStrategy::default(),
            text_window: DEFAULT_TEXT_WINDOW,
            excluded_categories: vec![CIVIL_AVIATION.to_string(), TARIFF_CONCESSION.to_string()],
        }
    }
}

impl AnalysisConfig {
    pub fn with_strategy(mut self, strategy: InForceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), strategy = config.strategy.as_str(), text_window = config.text_window, "loaded analysis config");
        Ok(config)
    }

    /// Check the config against the tables it will run with.
    pub fn validate(&self, tables: &ClassifierTables) -> Result<(), CoreError> {
        if !TEXT_WINDOW_RANGE.contains(&self.text_window) {
            return Err(CoreError::InvalidConfig(format!(
                "text_window {} outside {}..={}",
                self.text_window,
                TEXT_WINDOW_RANGE.start(),
                TEXT_WINDOW_RANGE.end()
            )));
        }
        let known = tables.exclusion_names();
        if let Some(unknown) = self
            .excluded_categories
            .iter()
            .find(|name| !known.contains(&name.as_str()))
        {
            return Err(CoreError::InvalidConfig(format!(
                "unknown exclusion category {unknown:?}; known: {}",
                known.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.strategy, InForceStrategy::StatusHistory);
        assert_eq!(config.text_window, 3000);
        assert_eq!(config.excluded_categories, vec!["civil_aviation", "tariff_concession"]);
        config.validate(&ClassifierTables::standard()).unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"strategy": "making_year"}"#).unwrap();
        assert_eq!(config.strategy, InForceStrategy::MakingYear);
        assert_eq!(config.text_window, DEFAULT_TEXT_WINDOW);
        assert_eq!(config.excluded_categories.len(), 2);
    }

    #[test]
    fn window_out_of_range() {
        let config = AnalysisConfig {
            text_window: 10_000,
            ..Default::default()
        };
        let err = config.validate(&ClassifierTables::standard()).unwrap_err();
        assert!(err.to_string().contains("text_window"));
    }

    #[test]
    fn unknown_category() {
        let config = AnalysisConfig {
            excluded_categories: vec!["maritime".into()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&ClassifierTables::standard()),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regstock.json");
        std::fs::write(&path, r#"{"text_window": 2500, "excluded_categories": []}"#).unwrap();

        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.text_window, 2500);
        assert!(config.excluded_categories.is_empty());
    }
}

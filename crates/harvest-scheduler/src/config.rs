//! Scheduler configuration
//!
//! Tunables shared by every job, loaded from RON. Missing fields take their
//! defaults, so a config file only needs to name what it changes.

use crate::error::{Error, Result};
use harvest_core::{cached, history, ProductId, Tick};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for jobs and the job manager
///
/// # Example
///
/// ```
/// use harvest_scheduler::SchedulerConfig;
///
/// let config = SchedulerConfig::from_ron("(yield_cache_ttl: 60)").unwrap();
/// assert_eq!(config.yield_cache_ttl, 60);
/// assert_eq!(config.update_interval, 2500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Time-to-live of the designated-yield cache, in ticks
    pub yield_cache_ttl: Tick,
    /// Immature targets qualify only with a yield strictly above this
    pub min_immature_yield: u32,
    /// Lower clamp for distances in the yield-density ranking
    pub min_distance: f32,
    /// Samples retained by each job's history
    pub history_capacity: usize,
    /// Ticks between history samples
    pub history_interval: Tick,
    /// Ticks between scheduling runs of one job
    pub update_interval: Tick,
    /// Stock product counted by forestry jobs
    pub wood_product: ProductId,
    /// Harvest tag that marks a resource as wood
    pub wood_tag: String,
}

impl SchedulerConfig {
    /// Parse and validate a RON document
    pub fn from_ron(content: &str) -> Result<Self> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_distance must be positive, got {}",
                self.min_distance
            )));
        }
        if self.history_capacity == 0 {
            return Err(Error::InvalidConfig(
                "history_capacity must be greater than 0".to_string(),
            ));
        }
        if self.update_interval == 0 {
            return Err(Error::InvalidConfig(
                "update_interval must be greater than 0".to_string(),
            ));
        }
        if self.wood_product.as_str().is_empty() {
            return Err(Error::InvalidConfig(
                "wood_product must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            yield_cache_ttl: cached::DEFAULT_TTL,
            min_immature_yield: 1,
            min_distance: 1.0,
            history_capacity: history::DEFAULT_CAPACITY,
            history_interval: 250,
            update_interval: 2500,
            wood_product: ProductId::new("WoodLog"),
            wood_tag: "Wood".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.yield_cache_ttl, 250);
        assert_eq!(config.min_immature_yield, 1);
        assert_eq!(config.wood_product.as_str(), "WoodLog");
    }

    #[test]
    fn test_parse_partial_document() {
        let config = SchedulerConfig::from_ron(
            r#"(
                min_distance: 2.5,
                wood_product: "Timber",
            )"#,
        )
        .unwrap();

        assert_eq!(config.min_distance, 2.5);
        assert_eq!(config.wood_product.as_str(), "Timber");
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.wood_tag, "Wood");
    }

    #[test]
    fn test_round_trip_through_ron() {
        let mut config = SchedulerConfig::default();
        config.update_interval = 600;

        let text = config.to_ron().unwrap();
        assert_eq!(SchedulerConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = SchedulerConfig::from_ron("(min_distance: 0.0)").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = SchedulerConfig::from_ron("(history_capacity: 0)").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = SchedulerConfig::from_ron("(update_interval: 0)").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = SchedulerConfig::from_ron(r#"(wood_product: "")"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_ron() {
        let err = SchedulerConfig::from_ron("(yield_cache_ttl: \"soon\")").unwrap_err();
        assert!(matches!(err, Error::Ron(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchedulerConfig::load("/nonexistent/harvest.ron").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

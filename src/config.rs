//! Analysis configuration
//!
//! Thresholds shared by the analyzers. Every field has a default, so a partial
//! JSON document only overrides what it names.

use crate::error::InsightError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Maximum gap in days between two entries that still continues a streak
pub const DEFAULT_STREAK_GAP_DAYS: i64 = 2;

/// Minimum |r| for a correlation to produce an insight
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.3;

/// Tunable thresholds for every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Maximum gap (days) between entries that continues a streak
    pub streak_gap_days: i64,
    /// Minimum paired samples before a correlation is reported
    pub min_correlation_samples: usize,
    /// Minimum |r| before a correlation becomes an insight
    pub correlation_threshold: f64,
    /// Maximum number of root causes returned
    pub root_cause_limit: usize,
    /// Adherence below this flags irregular tracking
    pub adherence_alert_threshold: f64,
    /// Stability (0-1) above which behavior counts as stable
    pub stability_threshold: f64,
    /// Number of habits reported as high impact
    pub high_impact_habits: usize,
    /// Wake time used to build sleep schedules
    pub wake_time: NaiveTime,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            streak_gap_days: DEFAULT_STREAK_GAP_DAYS,
            min_correlation_samples: 2,
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
            root_cause_limit: 3,
            adherence_alert_threshold: 0.7,
            stability_threshold: 0.6,
            high_impact_habits: 2,
            wake_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
        }
    }
}

impl InsightConfig {
    /// Load configuration from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> Result<Self, InsightError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, InsightError> {
        serde_json::to_string_pretty(self).map_err(|e| InsightError::EncodingError(e.to_string()))
    }

    /// Reject thresholds that would make the analyses meaningless
    pub fn validate(&self) -> Result<(), InsightError> {
        if self.streak_gap_days < 1 {
            return Err(InsightError::ConfigError(format!(
                "streak_gap_days must be at least 1, got {}",
                self.streak_gap_days
            )));
        }
        if self.min_correlation_samples < 2 {
            return Err(InsightError::ConfigError(
                "min_correlation_samples must be at least 2".to_string(),
            ));
        }
        for (name, value) in [
            ("correlation_threshold", self.correlation_threshold),
            ("adherence_alert_threshold", self.adherence_alert_threshold),
            ("stability_threshold", self.stability_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InsightError::ConfigError(format!(
                    "{name} must be within 0-1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

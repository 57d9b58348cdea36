//! Recovery and stability analysis
//!
//! Estimates how quickly a user bounces back after a lapse and how stable
//! their logging behavior is, from consistency, adherence and history length.

use crate::aggregation::{round_to, Aggregator, HistoryMetrics};
use crate::config::InsightConfig;
use crate::types::HealthEntry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bounds on predicted recovery time (days)
const MIN_RECOVERY_DAYS: f64 = 1.0;
const MAX_RECOVERY_DAYS: f64 = 14.0;

/// History length at which the tenure component saturates
const TENURE_SATURATION_DAYS: f64 = 90.0;

/// Qualitative stability risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityRisk {
    Low,
    High,
}

/// Recovery and stability report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryAnalysis {
    /// Predicted days to recover from a setback (1-14)
    pub recovery_days: f64,
    /// Stability score (0-100)
    pub stability_score: f64,
    pub is_stable: bool,
    pub risk_level: StabilityRisk,
    pub consistency_score: f64,
    pub adherence_rate: f64,
    pub streak_days: u32,
    pub missed_days: u32,
    pub recommendations: Vec<String>,
    pub metrics: HistoryMetrics,
}

/// Analyzer for recovery speed and behavior stability
pub struct RecoveryAnalyzer {
    aggregator: Aggregator,
    stability_threshold: f64,
}

impl Default for RecoveryAnalyzer {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

impl RecoveryAnalyzer {
    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            aggregator: Aggregator::from_config(config),
            stability_threshold: config.stability_threshold,
        }
    }

    /// Analyze an entry history
    pub fn analyze(&self, entries: &[HealthEntry]) -> RecoveryAnalysis {
        let metrics = self.aggregator.metrics(entries);

        let recovery_days =
            predict_recovery_days(metrics.consistency_score, metrics.adherence_rate);
        let stability = stability_index(
            metrics.consistency_score,
            metrics.adherence_rate,
            metrics.days_active,
        );
        let is_stable = stability > self.stability_threshold;
        let stability_score = round_to(stability * 100.0, 1);

        debug!(recovery_days, stability_score, is_stable, "recovery analysis");

        RecoveryAnalysis {
            recovery_days,
            stability_score,
            is_stable,
            risk_level: if is_stable {
                StabilityRisk::Low
            } else {
                StabilityRisk::High
            },
            consistency_score: metrics.consistency_score,
            adherence_rate: metrics.adherence_rate,
            streak_days: metrics.streak_days,
            missed_days: metrics.missed_days,
            recommendations: recovery_recommendations(recovery_days, stability_score),
            metrics,
        }
    }
}

/// Days to recover from a setback: three days baseline, slowed by irregular logging
pub fn predict_recovery_days(consistency: f64, adherence: f64) -> f64 {
    let days = 3.0 + (1.0 - consistency) * 5.0 + (1.0 - adherence) * 4.0;
    round_to(days.clamp(MIN_RECOVERY_DAYS, MAX_RECOVERY_DAYS), 1)
}

/// Stability index (0-1) weighted 40/40/20 over consistency, adherence and tenure
pub fn stability_index(consistency: f64, adherence: f64, days_active: u32) -> f64 {
    let tenure = (days_active as f64 / TENURE_SATURATION_DAYS).min(1.0);
    (consistency * 0.4 + adherence * 0.4 + tenure * 0.2).clamp(0.0, 1.0)
}

fn recovery_recommendations(recovery_days: f64, stability_score: f64) -> Vec<String> {
    let mut recommendations = Vec::with_capacity(4);

    if recovery_days > 7.0 {
        recommendations.push("Focus on building consistency with small, daily habits");
        recommendations.push("Set reminders to track your progress daily");
    } else if recovery_days > 4.0 {
        recommendations.push("Maintain your current routine and track progress");
        recommendations.push("Celebrate small wins to maintain motivation");
    } else {
        recommendations.push("You have strong recovery patterns - keep it up!");
        recommendations.push("Consider increasing challenge level gradually");
    }

    if stability_score < 50.0 {
        recommendations.push("Build a support system or accountability partner");
        recommendations.push("Identify and remove barriers to consistency");
    } else if stability_score < 70.0 {
        recommendations.push("Focus on maintaining current habits");
        recommendations.push("Plan for potential setbacks in advance");
    } else {
        recommendations.push("Your habits are well-established");
        recommendations.push("Consider adding new healthy habits");
    }

    recommendations.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_entries(count: usize, step_days: i64) -> Vec<HealthEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| HealthEntry::new(start + Duration::days(i as i64 * step_days), 70.0))
            .collect()
    }

    #[test]
    fn test_perfect_logging_recovers_fast() {
        let analysis = RecoveryAnalyzer::default().analyze(&make_entries(30, 1));

        assert_eq!(analysis.recovery_days, 3.0);
        // 0.4 + 0.4 + (30 / 90) * 0.2 = 0.8667
        assert!((analysis.stability_score - 86.7).abs() < 1e-9);
        assert!(analysis.is_stable);
        assert_eq!(analysis.risk_level, StabilityRisk::Low);
        assert_eq!(analysis.streak_days, 30);
        assert_eq!(
            analysis.recommendations[0],
            "You have strong recovery patterns - keep it up!"
        );
        assert_eq!(analysis.recommendations[2], "Your habits are well-established");
    }

    #[test]
    fn test_sparse_logging_is_unstable() {
        // Every fifth day: consistency 2/6 = 0.33, adherence 5/21 = 0.24
        let analysis = RecoveryAnalyzer::default().analyze(&make_entries(5, 5));

        assert!(analysis.recovery_days > 7.0);
        assert!(!analysis.is_stable);
        assert_eq!(analysis.risk_level, StabilityRisk::High);
        assert_eq!(analysis.recommendations.len(), 4);
        assert_eq!(
            analysis.recommendations[3],
            "Identify and remove barriers to consistency"
        );
    }

    #[test]
    fn test_empty_history_uses_midpoints() {
        let analysis = RecoveryAnalyzer::default().analyze(&[]);

        // 3 + 0.5 * 5 + 0.5 * 4
        assert_eq!(analysis.recovery_days, 7.5);
        assert_eq!(analysis.stability_score, 40.0);
        assert_eq!(analysis.streak_days, 0);
    }

    #[test]
    fn test_recovery_days_bounded() {
        for (c, a) in [(0.0, 0.0), (1.0, 1.0), (0.2, 0.9), (0.5, 0.1)] {
            let days = predict_recovery_days(c, a);
            assert!((MIN_RECOVERY_DAYS..=MAX_RECOVERY_DAYS).contains(&days));
        }
    }
}

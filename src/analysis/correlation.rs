//! Behavior-cause correlation analysis
//!
//! Relates logged behaviors (sleep, exercise, calories) to day-over-day weight
//! change and turns strong correlations into insights and likely root causes.

use crate::aggregation::{mean, round_to, Aggregator};
use crate::config::InsightConfig;
use crate::types::{BehaviorField, HealthEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const CONTINUE_TRACKING: &str =
    "Continue tracking to identify patterns. More data needed for root cause analysis.";

/// Direction of a behavior's effect on the user's goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Positive,
    Negative,
    Critical,
}

/// A single behavior insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorInsight {
    pub behavior: String,
    pub impact: Impact,
    pub correlation: f64,
    pub insight: String,
    pub recommendation: String,
}

/// Correlation analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub insights: Vec<BehaviorInsight>,
    /// Correlation per behavior; behaviors without enough data are absent
    pub correlations: BTreeMap<BehaviorField, f64>,
    pub root_causes: Vec<String>,
    pub data_points: usize,
    pub message: String,
}

/// Analyzer for behavior/weight-change correlations
pub struct CorrelationAnalyzer {
    aggregator: Aggregator,
    threshold: f64,
    root_cause_limit: usize,
    adherence_alert_threshold: f64,
}

impl Default for CorrelationAnalyzer {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

impl CorrelationAnalyzer {
    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            aggregator: Aggregator::from_config(config),
            threshold: config.correlation_threshold,
            root_cause_limit: config.root_cause_limit,
            adherence_alert_threshold: config.adherence_alert_threshold,
        }
    }

    /// Analyze correlations across an entry history
    pub fn analyze(&self, entries: &[HealthEntry]) -> CorrelationAnalysis {
        if entries.is_empty() {
            return CorrelationAnalysis {
                insights: Vec::new(),
                correlations: BTreeMap::new(),
                root_causes: vec![
                    "Continue tracking to identify patterns. More data will provide better insights."
                        .to_string(),
                ],
                data_points: 0,
                message: "Add more data points for detailed correlation analysis".to_string(),
            };
        }

        let mut correlations = BTreeMap::new();
        let mut insights = Vec::new();
        let mut root_causes = Vec::new();

        for field in BehaviorField::ALL {
            let Some(r) = self.aggregator.behavior_correlation(entries, field) else {
                debug!(behavior = field.as_str(), "correlation omitted");
                continue;
            };
            correlations.insert(field, round_to(r, 3));

            // Threshold applies to the unrounded coefficient
            if r.abs() <= self.threshold {
                continue;
            }
            if let Some((insight, root_cause)) = self.behavior_insight(field, r, entries) {
                insights.push(insight);
                root_causes.extend(root_cause);
            }
        }

        if entries.len() > 1 {
            let adherence = self.aggregator.metrics(entries).adherence_rate;
            if adherence < self.adherence_alert_threshold {
                insights.push(BehaviorInsight {
                    behavior: "Data Consistency".to_string(),
                    impact: Impact::Critical,
                    correlation: round_to(1.0 - adherence, 2),
                    insight: format!(
                        "Irregular tracking ({:.0}% of days logged) makes it hard to identify patterns.",
                        adherence * 100.0
                    ),
                    recommendation: "Track your data daily for better insights".to_string(),
                });
                root_causes.push(
                    "Inconsistent tracking prevents accurate pattern identification".to_string(),
                );
            }
        }

        if root_causes.is_empty() {
            root_causes.push(CONTINUE_TRACKING.to_string());
        }
        root_causes.truncate(self.root_cause_limit);

        debug!(
            insights = insights.len(),
            correlations = correlations.len(),
            "correlation analysis"
        );

        CorrelationAnalysis {
            insights,
            correlations,
            root_causes,
            data_points: entries.len(),
            message: format!("Analyzed {} data points", entries.len()),
        }
    }

    /// Build the insight for a strong correlation, with its root cause if any
    fn behavior_insight(
        &self,
        field: BehaviorField,
        r: f64,
        entries: &[HealthEntry],
    ) -> Option<(BehaviorInsight, Option<String>)> {
        let correlation = round_to(r, 2);
        let average = || {
            let values: Vec<f64> = entries.iter().filter_map(|e| field.value(e)).collect();
            mean(&values).unwrap_or(0.0)
        };

        match field {
            BehaviorField::Sleep if r < -self.threshold => Some((
                BehaviorInsight {
                    behavior: "Sleep Hours".to_string(),
                    impact: Impact::Positive,
                    correlation,
                    insight: "When you sleep more, your weight tends to decrease. Optimal: 7-9 hours."
                        .to_string(),
                    recommendation: "Maintain consistent sleep schedule of 7-9 hours".to_string(),
                },
                Some(
                    "Insufficient sleep may be contributing to weight management challenges"
                        .to_string(),
                ),
            )),
            BehaviorField::Sleep => Some((
                BehaviorInsight {
                    behavior: "Sleep Hours".to_string(),
                    impact: Impact::Negative,
                    correlation,
                    insight: "Excessive sleep may be affecting your weight. Target: 7-9 hours."
                        .to_string(),
                    recommendation: "Maintain optimal sleep duration of 7-9 hours".to_string(),
                },
                None,
            )),
            BehaviorField::Exercise if r < -self.threshold => Some((
                BehaviorInsight {
                    behavior: "Exercise Minutes".to_string(),
                    impact: Impact::Positive,
                    correlation,
                    insight: format!(
                        "More exercise correlates with weight loss. Current avg: {:.0} min/day.",
                        average()
                    ),
                    recommendation: "Increase exercise frequency to 30-60 minutes daily"
                        .to_string(),
                },
                Some("Regular exercise is a key factor in your weight management".to_string()),
            )),
            BehaviorField::Calories if r > self.threshold => Some((
                BehaviorInsight {
                    behavior: "Calories Consumed".to_string(),
                    impact: Impact::Negative,
                    correlation,
                    insight: format!(
                        "Higher calorie intake correlates with weight gain. Current avg: {:.0} cal/day.",
                        average()
                    ),
                    recommendation: "Monitor and reduce calorie intake to target range".to_string(),
                },
                Some("Calorie intake is a primary driver of weight changes".to_string()),
            )),
            _ => None,
        }
    }
}

/// Predicted weight change (kg) for a set of daily behaviors.
///
/// Missing or zero inputs fall back to 7 h sleep, 30 min exercise, 2000 kcal
/// and 0.7 consistency.
pub fn predict_impact(
    sleep_hours: Option<f64>,
    exercise_minutes: Option<f64>,
    calories: Option<f64>,
    consistency: Option<f64>,
) -> f64 {
    let or_default =
        |value: Option<f64>, default: f64| value.filter(|v| *v != 0.0).unwrap_or(default);
    let sleep = or_default(sleep_hours, 7.0);
    let exercise = or_default(exercise_minutes, 30.0);
    let calories = or_default(calories, 2000.0);
    let consistency = or_default(consistency, 0.7);

    let change = -0.1 * (sleep - 7.0) - 0.01 * exercise + 0.0003 * (calories - 2000.0)
        - 0.5 * (1.0 - consistency);
    round_to(change, 2)
}

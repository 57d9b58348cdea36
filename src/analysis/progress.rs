//! Goal progress assessment

use crate::aggregation::{round_to, sorted_entries};
use crate::types::{HealthEntry, HealthGoal};
use serde::{Deserialize, Serialize};

/// Progress status towards the user's goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Excellent,
    Good,
    Maintaining,
    NeedsImprovement,
    InsufficientData,
}

/// Weight progress between the first and last entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressAssessment {
    pub status: ProgressStatus,
    pub message: String,
    /// Last minus first weight (kg)
    pub weight_change: f64,
    pub weight_change_pct: f64,
    /// Change in the goal's direction; positive is progress
    pub improvement: f64,
}

/// Assess weight progress against a goal
pub fn assess_progress(entries: &[HealthEntry], goal: HealthGoal) -> ProgressAssessment {
    let ordered = sorted_entries(entries);
    let (first, last) = match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) if ordered.len() >= 2 => (first, last),
        _ => {
            return ProgressAssessment {
                status: ProgressStatus::InsufficientData,
                message: "Add more data to track progress".to_string(),
                weight_change: 0.0,
                weight_change_pct: 0.0,
                improvement: 0.0,
            }
        }
    };

    let change = last.weight - first.weight;
    let change_pct = if first.weight > 0.0 {
        change / first.weight * 100.0
    } else {
        0.0
    };

    let (status, message, improvement) = match goal {
        HealthGoal::WeightLoss => {
            let (status, message) = if change < -1.0 {
                (ProgressStatus::Excellent, format!("Great progress! Lost {:.1} kg", change.abs()))
            } else if change < 0.0 {
                (ProgressStatus::Good, format!("Good progress! Lost {:.1} kg", change.abs()))
            } else if change < 1.0 {
                (ProgressStatus::Maintaining, "Weight is stable. Keep going!".to_string())
            } else {
                (
                    ProgressStatus::NeedsImprovement,
                    format!("Weight increased by {change:.1} kg. Review your plan."),
                )
            };
            (status, message, -change)
        }
        HealthGoal::MuscleGain => {
            let (status, message) = if change > 1.0 {
                (ProgressStatus::Excellent, format!("Great progress! Gained {change:.1} kg"))
            } else if change > 0.0 {
                (ProgressStatus::Good, format!("Good progress! Gained {change:.1} kg"))
            } else if change > -0.5 {
                (
                    ProgressStatus::Maintaining,
                    "Weight is stable. Increase calories and exercise.".to_string(),
                )
            } else {
                (
                    ProgressStatus::NeedsImprovement,
                    format!(
                        "Weight decreased by {:.1} kg. Increase calorie intake.",
                        change.abs()
                    ),
                )
            };
            (status, message, change)
        }
        HealthGoal::Maintenance | HealthGoal::General => {
            let drift = change.abs();
            let (status, message) = if drift < 1.0 {
                (ProgressStatus::Excellent, "Excellent! Weight is well maintained.".to_string())
            } else if drift < 2.0 {
                (ProgressStatus::Good, "Good! Weight is relatively stable.".to_string())
            } else {
                (
                    ProgressStatus::NeedsImprovement,
                    format!("Weight changed by {drift:.1} kg. Focus on consistency."),
                )
            };
            (status, message, -drift)
        }
    };

    ProgressAssessment {
        status,
        message,
        weight_change: round_to(change, 1),
        weight_change_pct: round_to(change_pct, 1),
        improvement: round_to(improvement, 2),
    }
}

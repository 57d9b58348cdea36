//! Habit sensitivity analysis
//!
//! Scores each tracked habit (diet, exercise, sleep) for fragility, meaning how
//! likely it is to lapse, and for its expected health impact.

use crate::aggregation::{consistency_score, round_to, sorted_entries};
use crate::config::InsightConfig;
use crate::types::{HealthEntry, HealthGoal};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Duration at which a habit counts as fully established
const ESTABLISHED_DAYS: f64 = 180.0;

/// Fragility above this marks a habit as fragile
const FRAGILITY_THRESHOLD: f64 = 0.5;

/// Tracked habit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    Diet,
    Exercise,
    Sleep,
}

impl HabitKind {
    pub fn name(&self) -> &'static str {
        match self {
            HabitKind::Diet => "Diet Tracking",
            HabitKind::Exercise => "Exercise Routine",
            HabitKind::Sleep => "Sleep Schedule",
        }
    }

    /// Ordinal used by the impact score; lower types weigh more
    fn type_index(&self) -> f64 {
        match self {
            HabitKind::Diet => 0.0,
            HabitKind::Exercise => 1.0,
            HabitKind::Sleep => 2.0,
        }
    }

    fn complexity(&self) -> f64 {
        match self {
            HabitKind::Diet => 0.6,
            HabitKind::Exercise => 0.7,
            HabitKind::Sleep => 0.3,
        }
    }

    fn support_level(&self) -> f64 {
        match self {
            HabitKind::Diet => 0.7,
            HabitKind::Exercise => 0.6,
            HabitKind::Sleep => 0.8,
        }
    }

    fn personal_relevance(&self, goal: HealthGoal) -> f64 {
        match (self, goal.targets_weight()) {
            (HabitKind::Diet, true) => 0.8,
            (HabitKind::Diet, false) => 0.5,
            (HabitKind::Exercise, true) => 0.9,
            (HabitKind::Exercise, false) => 0.6,
            (HabitKind::Sleep, _) => 0.7,
        }
    }

    /// Whether an entry counts as practicing this habit
    fn is_logged(&self, entry: &HealthEntry) -> bool {
        match self {
            HabitKind::Diet => entry.calories_consumed.is_some(),
            HabitKind::Exercise => entry.exercise_minutes.is_some_and(|m| m > 0.0),
            HabitKind::Sleep => entry.sleep_hours.is_some(),
        }
    }
}

/// Inputs to the fragility and impact scores
#[derive(Debug, Clone, Copy)]
pub struct HabitFeatures {
    pub kind: HabitKind,
    pub duration_days: i64,
    /// Fraction of entries where the habit was logged (0-1)
    pub frequency: f64,
    pub complexity: f64,
    pub support_level: f64,
    pub personal_relevance: f64,
}

impl HabitFeatures {
    /// Likelihood the habit lapses (0-1)
    pub fn fragility(&self) -> f64 {
        let duration = (self.duration_days.max(0) as f64).min(ESTABLISHED_DAYS);
        let score = (1.0 - duration / ESTABLISHED_DAYS) * 0.3
            + (1.0 - self.frequency) * 0.3
            + self.complexity * 0.2
            + (1.0 - self.support_level) * 0.1
            + (1.0 - self.personal_relevance) * 0.1;
        score.clamp(0.0, 1.0)
    }

    /// Expected effect on health (0-1)
    pub fn impact(&self) -> f64 {
        let score = (1.0 - self.kind.type_index() / 4.0) * 0.2
            + self.frequency * 0.3
            + (1.0 - self.complexity) * 0.2
            + self.personal_relevance * 0.3;
        score.clamp(0.0, 1.0)
    }

    fn recommendations(&self, is_fragile: bool) -> Vec<String> {
        let mut recommendations = Vec::new();
        if is_fragile {
            if self.frequency < 0.5 {
                recommendations.push("Increase frequency - aim for daily practice");
            }
            if self.complexity > 0.6 {
                recommendations.push("Simplify the habit - break into smaller steps");
            }
            if self.support_level < 0.6 {
                recommendations.push("Build support system or accountability");
            }
            if self.duration_days < 30 {
                recommendations.push("Habit needs more time to establish (aim for 30+ days)");
            }
        } else {
            recommendations.push("Habit is well-established - maintain consistency");
            if self.frequency < 0.8 {
                recommendations.push("Consider increasing frequency for better results");
            }
        }
        recommendations.into_iter().map(String::from).collect()
    }
}

/// Scored habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitScore {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HabitKind,
    /// Fragility (0-100)
    pub fragility_score: f64,
    pub is_fragile: bool,
    /// Impact (0-100)
    pub impact_score: f64,
    /// Percentage of entries where the habit was logged
    pub frequency: f64,
    pub duration_days: i64,
    /// Logging regularity of the habit (0-100)
    pub consistency: f64,
    pub recommendations: Vec<String>,
}

/// Habit sensitivity report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitAnalysis {
    pub habits: Vec<HabitScore>,
    pub fragile_habits: Vec<HabitScore>,
    pub resilient_habits: Vec<HabitScore>,
    pub high_impact_habits: Vec<HabitScore>,
    pub total_habits: usize,
    pub message: String,
}

/// Analyzer for habit fragility and impact
pub struct HabitAnalyzer {
    high_impact_count: usize,
}

impl Default for HabitAnalyzer {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

impl HabitAnalyzer {
    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            high_impact_count: config.high_impact_habits,
        }
    }

    /// Analyze every habit with at least one logged entry
    pub fn analyze(&self, entries: &[HealthEntry], goal: HealthGoal) -> HabitAnalysis {
        if entries.is_empty() {
            return HabitAnalysis {
                habits: Vec::new(),
                fragile_habits: Vec::new(),
                resilient_habits: Vec::new(),
                high_impact_habits: Vec::new(),
                total_habits: 0,
                message: "Add more data points for detailed habit analysis".to_string(),
            };
        }

        let ordered = sorted_entries(entries);
        let duration_days = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        };

        let habits: Vec<HabitScore> = [HabitKind::Diet, HabitKind::Exercise, HabitKind::Sleep]
            .into_iter()
            .filter_map(|kind| score_habit(kind, &ordered, duration_days, goal))
            .collect();

        let (fragile_habits, resilient_habits): (Vec<HabitScore>, Vec<HabitScore>) =
            habits.iter().cloned().partition(|h| h.is_fragile);

        let mut high_impact_habits = habits.clone();
        high_impact_habits.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
        high_impact_habits.truncate(self.high_impact_count);

        debug!(
            habits = habits.len(),
            fragile = fragile_habits.len(),
            "habit analysis"
        );

        HabitAnalysis {
            total_habits: habits.len(),
            message: format!(
                "Analyzed {} habits from {} data points",
                habits.len(),
                entries.len()
            ),
            habits,
            fragile_habits,
            resilient_habits,
            high_impact_habits,
        }
    }
}

fn score_habit(
    kind: HabitKind,
    ordered: &[&HealthEntry],
    duration_days: i64,
    goal: HealthGoal,
) -> Option<HabitScore> {
    let dates: Vec<NaiveDate> = ordered
        .iter()
        .filter(|e| kind.is_logged(e))
        .map(|e| e.date)
        .collect();
    if dates.is_empty() {
        return None;
    }

    let features = HabitFeatures {
        kind,
        duration_days,
        frequency: dates.len() as f64 / ordered.len() as f64,
        complexity: kind.complexity(),
        support_level: kind.support_level(),
        personal_relevance: kind.personal_relevance(goal),
    };
    let fragility = features.fragility();
    let is_fragile = fragility > FRAGILITY_THRESHOLD;

    Some(HabitScore {
        name: kind.name().to_string(),
        kind,
        fragility_score: round_to(fragility * 100.0, 1),
        is_fragile,
        impact_score: round_to(features.impact() * 100.0, 1),
        frequency: round_to(features.frequency * 100.0, 1),
        duration_days,
        consistency: round_to(consistency_score(&dates) * 100.0, 1),
        recommendations: features.recommendations(is_fragile),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_entries(count: usize) -> Vec<HealthEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| HealthEntry::new(start + Duration::days(i as i64), 70.0))
            .collect()
    }

    #[test]
    fn test_empty_history() {
        let analysis = HabitAnalyzer::default().analyze(&[], HealthGoal::General);
        assert_eq!(analysis.total_habits, 0);
        assert_eq!(
            analysis.message,
            "Add more data points for detailed habit analysis"
        );
    }

    #[test]
    fn test_only_logged_habits_are_scored() {
        let mut entries = make_entries(10);
        for entry in &mut entries {
            entry.sleep_hours = Some(7.5);
            entry.exercise_minutes = Some(0.0);
        }

        let analysis = HabitAnalyzer::default().analyze(&entries, HealthGoal::General);

        assert_eq!(analysis.total_habits, 1);
        assert_eq!(analysis.habits[0].kind, HabitKind::Sleep);
        assert_eq!(analysis.habits[0].frequency, 100.0);
        assert_eq!(analysis.habits[0].consistency, 100.0);
        assert_eq!(analysis.habits[0].duration_days, 9);
    }

    #[test]
    fn test_short_sparse_exercise_is_fragile() {
        let mut entries = make_entries(10);
        entries[0].exercise_minutes = Some(30.0);
        entries[5].exercise_minutes = Some(30.0);

        let analysis = HabitAnalyzer::default().analyze(&entries, HealthGoal::WeightLoss);
        let exercise = &analysis.habits[0];

        assert!(exercise.is_fragile);
        assert_eq!(exercise.frequency, 20.0);
        assert_eq!(
            exercise.recommendations,
            vec![
                "Increase frequency - aim for daily practice".to_string(),
                "Simplify the habit - break into smaller steps".to_string(),
                "Habit needs more time to establish (aim for 30+ days)".to_string(),
            ]
        );
        assert_eq!(analysis.fragile_habits.len(), 1);
    }

    #[test]
    fn test_long_daily_sleep_is_resilient() {
        let mut entries = make_entries(200);
        for entry in &mut entries {
            entry.sleep_hours = Some(8.0);
        }

        let analysis = HabitAnalyzer::default().analyze(&entries, HealthGoal::General);
        let sleep = &analysis.habits[0];

        // 0 + 0 + 0.06 + 0.02 + 0.03
        assert!((sleep.fragility_score - 11.0).abs() < 1e-9);
        assert!(!sleep.is_fragile);
        assert_eq!(
            sleep.recommendations,
            vec!["Habit is well-established - maintain consistency".to_string()]
        );
        assert_eq!(analysis.resilient_habits.len(), 1);
    }

    #[test]
    fn test_high_impact_ranking() {
        let mut entries = make_entries(20);
        for entry in &mut entries {
            entry.sleep_hours = Some(7.0);
            entry.calories_consumed = Some(2000.0);
            entry.exercise_minutes = Some(30.0);
        }

        let analysis = HabitAnalyzer::default().analyze(&entries, HealthGoal::WeightLoss);

        assert_eq!(analysis.total_habits, 3);
        assert_eq!(analysis.high_impact_habits.len(), 2);
        let high = &analysis.high_impact_habits;
        assert!(high[0].impact_score >= high[1].impact_score);
        for habit in &analysis.habits {
            assert!((0.0..=100.0).contains(&habit.fragility_score));
            assert!((0.0..=100.0).contains(&habit.impact_score));
        }
    }

    #[test]
    fn test_relevance_depends_on_goal() {
        assert_eq!(HabitKind::Diet.personal_relevance(HealthGoal::MuscleGain), 0.8);
        assert_eq!(HabitKind::Diet.personal_relevance(HealthGoal::Maintenance), 0.5);
        assert_eq!(HabitKind::Sleep.personal_relevance(HealthGoal::WeightLoss), 0.7);
    }
}

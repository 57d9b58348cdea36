//! What-if simulator
//!
//! Projects weight, stability and recovery for a hypothetical sleep and
//! exercise routine held for a number of days, relative to the user's current
//! averages.

use crate::aggregation::{mean, round_to, sorted_entries};
use crate::error::InsightError;
use crate::types::{BehaviorField, HealthEntry, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest simulated horizon (days)
pub const MAX_SIMULATION_DAYS: u32 = 365;

/// A hypothetical daily routine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub sleep_hours: f64,
    pub exercise_minutes: f64,
    pub days: u32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            sleep_hours: 7.0,
            exercise_minutes: 0.0,
            days: 14,
        }
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), InsightError> {
        if !self.sleep_hours.is_finite() || !(0.0..=24.0).contains(&self.sleep_hours) {
            return Err(InsightError::InvalidScenario(format!(
                "sleep_hours must be within 0-24, got {}",
                self.sleep_hours
            )));
        }
        if !self.exercise_minutes.is_finite() || self.exercise_minutes < 0.0 {
            return Err(InsightError::InvalidScenario(format!(
                "exercise_minutes must not be negative, got {}",
                self.exercise_minutes
            )));
        }
        if !(1..=MAX_SIMULATION_DAYS).contains(&self.days) {
            return Err(InsightError::InvalidScenario(format!(
                "days must be within 1-{MAX_SIMULATION_DAYS}, got {}",
                self.days
            )));
        }
        Ok(())
    }
}

/// Current averages the scenario is compared against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub sleep_hours: f64,
    pub exercise_minutes: f64,
    pub weight: f64,
}

impl Baseline {
    /// Average logged sleep (7 h if none) and exercise (0 if none), and the
    /// latest weight falling back to the profile weight
    pub fn from_history(profile: &UserProfile, entries: &[HealthEntry]) -> Self {
        let average = |field: BehaviorField| {
            let values: Vec<f64> = entries.iter().filter_map(|e| field.value(e)).collect();
            mean(&values)
        };

        Self {
            sleep_hours: average(BehaviorField::Sleep).unwrap_or(7.0),
            exercise_minutes: average(BehaviorField::Exercise).unwrap_or(0.0),
            weight: sorted_entries(entries)
                .last()
                .map(|e| e.weight)
                .unwrap_or(profile.weight_kg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityLevel {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

impl StabilityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            StabilityLevel::Excellent
        } else if score >= 60.0 {
            StabilityLevel::Good
        } else if score >= 40.0 {
            StabilityLevel::Moderate
        } else {
            StabilityLevel::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverySpeed {
    VeryFast,
    Fast,
    Moderate,
    Slow,
}

impl RecoverySpeed {
    pub fn from_days(days: f64) -> Self {
        if days <= 5.0 {
            RecoverySpeed::VeryFast
        } else if days <= 10.0 {
            RecoverySpeed::Fast
        } else if days <= 15.0 {
            RecoverySpeed::Moderate
        } else {
            RecoverySpeed::Slow
        }
    }
}

/// Projected outcome of a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub predicted_weight: f64,
    pub weight_change: f64,
    /// Stability (0-100)
    pub stability_score: f64,
    pub stability_level: StabilityLevel,
    /// Days to recover from a setback (1-30)
    pub recovery_days: f64,
    pub recovery_speed: RecoverySpeed,
    pub sleep_improvement: f64,
    pub exercise_improvement: f64,
    pub days_simulated: u32,
    pub baseline: Baseline,
}

/// Simulate a scenario against the user's history
pub fn simulate(
    profile: &UserProfile,
    entries: &[HealthEntry],
    scenario: &Scenario,
) -> Result<SimulationResult, InsightError> {
    scenario.validate()?;
    Ok(simulate_from(Baseline::from_history(profile, entries), scenario))
}

/// Simulate a scenario against a known baseline. The scenario is assumed valid.
pub fn simulate_from(baseline: Baseline, scenario: &Scenario) -> SimulationResult {
    let sleep = scenario.sleep_hours;
    let exercise = scenario.exercise_minutes;
    let days = scenario.days as f64;

    let weight_change = -0.1 * exercise + 0.05 * (sleep - 7.0).powi(2) - 0.02 * days;
    let stability =
        (50.0 + 5.0 * sleep + 0.3 * exercise - 0.1 * (sleep - 7.5).abs()).clamp(0.0, 100.0);
    let recovery = (10.0 - 0.5 * sleep - 0.05 * exercise + 0.1 * days).clamp(1.0, 30.0);

    debug!(
        weight_change,
        stability,
        recovery,
        days = scenario.days,
        "simulated scenario"
    );

    SimulationResult {
        predicted_weight: round_to(baseline.weight + weight_change, 2),
        weight_change: round_to(weight_change, 2),
        stability_score: round_to(stability, 1),
        stability_level: StabilityLevel::from_score(stability),
        recovery_days: round_to(recovery, 1),
        recovery_speed: RecoverySpeed::from_days(recovery),
        sleep_improvement: round_to(sleep - baseline.sleep_hours, 1),
        exercise_improvement: round_to(exercise - baseline.exercise_minutes, 1),
        days_simulated: scenario.days,
        baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use chrono::NaiveDate;

    fn profile() -> UserProfile {
        UserProfile {
            age: 35,
            gender: Gender::Female,
            height_cm: 165.0,
            weight_kg: 68.0,
            activity_level: Default::default(),
            health_goal: Default::default(),
            dietary_preference: Default::default(),
            allergies: vec![],
            medical_conditions: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn test_baseline_defaults_without_history() {
        let baseline = Baseline::from_history(&profile(), &[]);
        assert_eq!(
            baseline,
            Baseline {
                sleep_hours: 7.0,
                exercise_minutes: 0.0,
                weight: 68.0,
            }
        );
    }

    #[test]
    fn test_baseline_from_history() {
        let mut early = HealthEntry::new(day(1), 70.0);
        early.sleep_hours = Some(6.0);
        early.exercise_minutes = Some(20.0);
        let mut late = HealthEntry::new(day(3), 69.0);
        late.sleep_hours = Some(8.0);
        late.exercise_minutes = Some(0.0);

        // Unordered input still picks the latest weight
        let baseline = Baseline::from_history(&profile(), &[late, early]);
        assert_eq!(baseline.sleep_hours, 7.0);
        assert_eq!(baseline.exercise_minutes, 20.0);
        assert_eq!(baseline.weight, 69.0);
    }

    #[test]
    fn test_simulation_formulas() {
        let baseline = Baseline {
            sleep_hours: 6.0,
            exercise_minutes: 10.0,
            weight: 80.0,
        };
        let scenario = Scenario {
            sleep_hours: 9.0,
            exercise_minutes: 30.0,
            days: 30,
        };
        let result = simulate_from(baseline, &scenario);

        // -3 + 0.2 - 0.6
        assert!((result.weight_change + 3.4).abs() < 1e-9);
        assert!((result.predicted_weight - 76.6).abs() < 1e-9);
        // 50 + 45 + 9 - 0.15, clamped
        assert_eq!(result.stability_score, 100.0);
        assert_eq!(result.stability_level, StabilityLevel::Excellent);
        // 10 - 4.5 - 1.5 + 3
        assert!((result.recovery_days - 7.0).abs() < 1e-9);
        assert_eq!(result.recovery_speed, RecoverySpeed::Fast);
        assert!((result.sleep_improvement - 3.0).abs() < 1e-9);
        assert!((result.exercise_improvement - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_outputs_are_clamped() {
        let baseline = Baseline::from_history(&profile(), &[]);
        let extremes = [
            Scenario { sleep_hours: 0.0, exercise_minutes: 0.0, days: 365 },
            Scenario { sleep_hours: 24.0, exercise_minutes: 600.0, days: 1 },
        ];
        for scenario in extremes {
            let result = simulate_from(baseline, &scenario);
            assert!((0.0..=100.0).contains(&result.stability_score));
            assert!((1.0..=30.0).contains(&result.recovery_days));
        }
    }

    #[test]
    fn test_invalid_scenarios_rejected() {
        let invalid = [
            Scenario { sleep_hours: 25.0, ..Default::default() },
            Scenario { exercise_minutes: -1.0, ..Default::default() },
            Scenario { days: 0, ..Default::default() },
            Scenario { days: 400, ..Default::default() },
        ];
        for scenario in invalid {
            assert!(matches!(
                simulate(&profile(), &[], &scenario),
                Err(InsightError::InvalidScenario(_))
            ));
        }
        assert!(simulate(&profile(), &[], &Scenario::default()).is_ok());
    }
}

//! Pipeline orchestration
//!
//! This module provides the public API for health insights. It takes raw
//! profile and entry JSON through parsing, validation, analysis and report
//! encoding.

use crate::aggregation::{sorted_entries, Aggregator, HistoryMetrics};
use crate::analysis::simulator::{self, Scenario, SimulationResult};
use crate::analysis::{
    assess_progress, risk, CorrelationAnalysis, CorrelationAnalyzer, HabitAnalysis, HabitAnalyzer,
    ProgressAssessment, RecoveryAnalysis, RecoveryAnalyzer, RiskAssessment,
};
use crate::config::InsightConfig;
use crate::encoder::InsightEncoder;
use crate::error::InsightError;
use crate::nutrition::{calories_by_date, daily_nutrition, DailyNutrition};
use crate::recommend::{
    recommend_diet, recommend_exercise, recommend_sleep, DietRecommendation, ExerciseRecommendation,
    SleepRecommendation,
};
use crate::schema::EntryAdapter;
use crate::types::{BehaviorField, FoodEntry, HealthEntry, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which analysis to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Full,
    Metrics,
    Recovery,
    Correlation,
    Habits,
    Risk,
    Progress,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Full => "full",
            AnalysisKind::Metrics => "metrics",
            AnalysisKind::Recovery => "recovery",
            AnalysisKind::Correlation => "correlation",
            AnalysisKind::Habits => "habits",
            AnalysisKind::Risk => "risk",
            AnalysisKind::Progress => "progress",
        }
    }
}

/// Which recommendation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    All,
    Diet,
    Exercise,
    Sleep,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::All => "recommendations",
            RecommendationKind::Diet => "diet",
            RecommendationKind::Exercise => "exercise",
            RecommendationKind::Sleep => "sleep",
        }
    }
}

/// Body metrics derived from the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetrics {
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
}

impl From<&UserProfile> for ProfileMetrics {
    fn from(profile: &UserProfile) -> Self {
        Self {
            bmi: profile.bmi(),
            bmr: profile.bmr(),
            tdee: profile.tdee(),
        }
    }
}

/// Every history analysis for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub profile: ProfileMetrics,
    pub metrics: HistoryMetrics,
    pub recovery: RecoveryAnalysis,
    pub correlation: CorrelationAnalysis,
    pub habits: HabitAnalysis,
    pub risk: RiskAssessment,
    pub progress: ProgressAssessment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nutrition: Vec<DailyNutrition>,
}

/// Diet, exercise and sleep plans together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub diet: DietRecommendation,
    pub exercise: ExerciseRecommendation,
    pub sleep: SleepRecommendation,
}

/// Run every analysis on raw profile and entry JSON.
///
/// # Arguments
/// * `profile_json` - User profile object
/// * `entries_json` - Health entries as a JSON array or NDJSON
///
/// # Returns
/// Pretty-printed report JSON wrapping a [`FullAnalysis`]
///
/// # Example
/// ```ignore
/// let report = analyze_json(profile_json, entries_json)?;
/// ```
pub fn analyze_json(profile_json: &str, entries_json: &str) -> Result<String, InsightError> {
    InsightProcessor::new().analyze_json(AnalysisKind::Full, profile_json, entries_json, None)
}

/// Run a single analysis on raw profile and entry JSON.
pub fn analyze_kind_json(
    kind: AnalysisKind,
    profile_json: &str,
    entries_json: &str,
) -> Result<String, InsightError> {
    InsightProcessor::new().analyze_json(kind, profile_json, entries_json, None)
}

/// Build recommendations from raw profile and entry JSON.
pub fn recommend_json(
    kind: RecommendationKind,
    profile_json: &str,
    entries_json: &str,
) -> Result<String, InsightError> {
    InsightProcessor::new().recommend_json(kind, profile_json, entries_json)
}

/// Simulate a what-if scenario from raw profile, entry and scenario JSON.
pub fn simulate_json(
    profile_json: &str,
    entries_json: &str,
    scenario_json: &str,
) -> Result<String, InsightError> {
    InsightProcessor::new().simulate_json(profile_json, entries_json, scenario_json)
}

/// Fill entries that have no calorie count from the day's logged food
pub fn fill_calories(entries: &mut [HealthEntry], foods: &[FoodEntry]) {
    if foods.is_empty() {
        return;
    }
    let calories = calories_by_date(foods);
    let mut filled = 0usize;
    for entry in entries.iter_mut().filter(|e| e.calories_consumed.is_none()) {
        if let Some(total) = calories.get(&entry.date) {
            entry.calories_consumed = Some(*total);
            filled += 1;
        }
    }
    debug!(filled, "calories filled from food log");
}

/// Processor holding a configuration and encoder for repeated calls.
///
/// Every report it produces carries the same producer instance id.
pub struct InsightProcessor {
    config: InsightConfig,
    encoder: InsightEncoder,
}

impl Default for InsightProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self {
            config: InsightConfig::default(),
            encoder: InsightEncoder::new(),
        }
    }

    /// Create a processor with a specific configuration
    pub fn with_config(config: InsightConfig) -> Self {
        Self {
            config,
            encoder: InsightEncoder::new(),
        }
    }

    /// Replace the configuration from JSON
    pub fn load_config(&mut self, json: &str) -> Result<(), InsightError> {
        self.config = InsightConfig::from_json(json)?;
        Ok(())
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn encoder(&self) -> &InsightEncoder {
        &self.encoder
    }

    /// Run every analysis. Entries need not be sorted; food entries fill
    /// missing calorie counts.
    pub fn full_analysis(
        &self,
        profile: &UserProfile,
        entries: &[HealthEntry],
        foods: &[FoodEntry],
    ) -> FullAnalysis {
        let mut entries = entries.to_vec();
        fill_calories(&mut entries, foods);

        FullAnalysis {
            profile: ProfileMetrics::from(profile),
            metrics: Aggregator::from_config(&self.config).metrics(&entries),
            recovery: RecoveryAnalyzer::from_config(&self.config).analyze(&entries),
            correlation: CorrelationAnalyzer::from_config(&self.config).analyze(&entries),
            habits: HabitAnalyzer::from_config(&self.config).analyze(&entries, profile.health_goal),
            risk: risk::assess(profile, &entries),
            progress: assess_progress(&entries, profile.health_goal),
            nutrition: daily_nutrition(foods),
        }
    }

    /// Build diet, exercise and sleep plans
    pub fn recommendations(
        &self,
        profile: &UserProfile,
        entries: &[HealthEntry],
    ) -> Recommendations {
        Recommendations {
            diet: recommend_diet(profile),
            exercise: recommend_exercise(profile),
            sleep: self.sleep_recommendation(profile, entries),
        }
    }

    /// Sleep plan adjusted for the exercise logged on the most recent day
    pub fn sleep_recommendation(
        &self,
        profile: &UserProfile,
        entries: &[HealthEntry],
    ) -> SleepRecommendation {
        let exercise_minutes = sorted_entries(entries)
            .last()
            .and_then(|e| BehaviorField::Exercise.value(e))
            .unwrap_or(0.0);
        recommend_sleep(profile, exercise_minutes, self.config.wake_time)
    }

    /// Simulate a scenario against the user's history
    pub fn simulate(
        &self,
        profile: &UserProfile,
        entries: &[HealthEntry],
        scenario: &Scenario,
    ) -> Result<SimulationResult, InsightError> {
        simulator::simulate(profile, entries, scenario)
    }

    /// Run one analysis on raw JSON and encode the report.
    ///
    /// `foods_json`, when given, is a JSON array of food entries used to fill
    /// missing calorie counts and to add daily nutrition to the full report.
    pub fn analyze_json(
        &self,
        kind: AnalysisKind,
        profile_json: &str,
        entries_json: &str,
        foods_json: Option<&str>,
    ) -> Result<String, InsightError> {
        let (profile, mut entries) = Self::parse_inputs(profile_json, entries_json)?;
        let foods = match foods_json {
            Some(json) => EntryAdapter::parse_food_entries(json)?,
            None => Vec::new(),
        };
        info!(
            kind = kind.as_str(),
            entries = entries.len(),
            foods = foods.len(),
            "running analysis"
        );

        fill_calories(&mut entries, &foods);

        let kind_name = kind.as_str();
        match kind {
            AnalysisKind::Full => {
                let body = self.full_analysis(&profile, &entries, &foods);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
            AnalysisKind::Metrics => {
                let body = Aggregator::from_config(&self.config).metrics(&entries);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
            AnalysisKind::Recovery => {
                let body = RecoveryAnalyzer::from_config(&self.config).analyze(&entries);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
            AnalysisKind::Correlation => {
                let body = CorrelationAnalyzer::from_config(&self.config).analyze(&entries);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
            AnalysisKind::Habits => {
                let body =
                    HabitAnalyzer::from_config(&self.config).analyze(&entries, profile.health_goal);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
            AnalysisKind::Risk => {
                let body = risk::assess(&profile, &entries);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
            AnalysisKind::Progress => {
                let body = assess_progress(&entries, profile.health_goal);
                self.encoder.encode_to_json(kind_name, &entries, body)
            }
        }
    }

    /// Build recommendations on raw JSON and encode the report
    pub fn recommend_json(
        &self,
        kind: RecommendationKind,
        profile_json: &str,
        entries_json: &str,
    ) -> Result<String, InsightError> {
        let (profile, entries) = Self::parse_inputs(profile_json, entries_json)?;
        info!(kind = kind.as_str(), entries = entries.len(), "building recommendation");

        match kind {
            RecommendationKind::All => {
                let body = self.recommendations(&profile, &entries);
                self.encoder.encode_to_json(kind.as_str(), &entries, body)
            }
            RecommendationKind::Diet => {
                self.encoder.encode_to_json(kind.as_str(), &entries, recommend_diet(&profile))
            }
            RecommendationKind::Exercise => {
                self.encoder.encode_to_json(kind.as_str(), &entries, recommend_exercise(&profile))
            }
            RecommendationKind::Sleep => {
                let body = self.sleep_recommendation(&profile, &entries);
                self.encoder.encode_to_json(kind.as_str(), &entries, body)
            }
        }
    }

    /// Simulate a scenario on raw JSON and encode the report
    pub fn simulate_json(
        &self,
        profile_json: &str,
        entries_json: &str,
        scenario_json: &str,
    ) -> Result<String, InsightError> {
        let (profile, entries) = Self::parse_inputs(profile_json, entries_json)?;
        let scenario: Scenario = serde_json::from_str(scenario_json)?;
        info!(
            days = scenario.days,
            sleep_hours = scenario.sleep_hours,
            exercise_minutes = scenario.exercise_minutes,
            "simulating scenario"
        );

        let body = self.simulate(&profile, &entries, &scenario)?;
        self.encoder.encode_to_json("simulation", &entries, body)
    }

    fn parse_inputs(
        profile_json: &str,
        entries_json: &str,
    ) -> Result<(UserProfile, Vec<HealthEntry>), InsightError> {
        let profile = EntryAdapter::parse_profile(profile_json)?;
        let entries = EntryAdapter::prepare(EntryAdapter::parse_auto(entries_json)?)?;
        Ok((profile, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MealType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const PROFILE: &str = r#"{
        "age": 30,
        "gender": "M",
        "height_cm": 180,
        "weight_kg": 80,
        "activity_level": "moderate",
        "health_goal": "weight_loss"
    }"#;

    const ENTRIES: &str = r#"[
        {"date": "2024-01-01", "weight": 70.0, "exercise_minutes": 10, "sleep_hours": 7.0},
        {"date": "2024-01-02", "weight": 69.8, "exercise_minutes": 20, "sleep_hours": 7.5},
        {"date": "2024-01-03", "weight": 69.9, "exercise_minutes": 30, "sleep_hours": 6.5},
        {"date": "2024-01-04", "weight": 69.5, "exercise_minutes": 40, "sleep_hours": 8.0},
        {"date": "2024-01-05", "weight": 69.3, "exercise_minutes": 50, "sleep_hours": 7.0}
    ]"#;

    fn parse(json: &str) -> serde_json::Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_analyze_json_full_report() {
        let report = parse(&analyze_json(PROFILE, ENTRIES).unwrap());

        assert_eq!(report["kind"], "full");
        assert_eq!(report["provenance"]["entries_analyzed"], 5);
        assert_eq!(report["body"]["metrics"]["streak_days"], 5);
        assert_eq!(report["body"]["metrics"]["adherence_rate"], 1.0);
        assert!(report["body"]["correlation"]["correlations"]["exercise"].as_f64().unwrap() < 0.0);
        assert_eq!(report["body"]["progress"]["status"], "good");
        assert!(report["body"].get("nutrition").is_none());
    }

    #[test]
    fn test_single_kind_report() {
        let report = parse(&analyze_kind_json(AnalysisKind::Recovery, PROFILE, ENTRIES).unwrap());
        assert_eq!(report["kind"], "recovery");
        let days = report["body"]["recovery_days"].as_f64().unwrap();
        assert!((1.0..=14.0).contains(&days));
    }

    #[test]
    fn test_ndjson_entries_accepted() {
        let ndjson = concat!(
            "{\"date\": \"2024-01-02\", \"weight\": 70.1}\n",
            "{\"date\": \"2024-01-01\", \"weight\": 70.4}\n",
        );
        let report = parse(&analyze_kind_json(AnalysisKind::Metrics, PROFILE, ndjson).unwrap());
        assert_eq!(report["body"]["days_active"], 2);
        assert_eq!(report["provenance"]["first_date"], "2024-01-01");
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let bad = r#"{"age": 0, "gender": "F", "height_cm": 165, "weight_kg": 60}"#;
        let err = analyze_json(bad, ENTRIES).unwrap_err();
        assert!(matches!(err, InsightError::InvalidProfile(_)));
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let entries = r#"[{"date": "2024-01-01", "weight": -5.0}]"#;
        let err = analyze_json(PROFILE, entries).unwrap_err();
        assert!(matches!(err, InsightError::InvalidEntry(_)));
    }

    #[test]
    fn test_recommend_all() {
        let report = parse(&recommend_json(RecommendationKind::All, PROFILE, ENTRIES).unwrap());
        assert_eq!(report["kind"], "recommendations");
        assert!(report["body"]["diet"]["calories"].as_f64().unwrap() > 0.0);
        assert!(!report["body"]["exercise"]["exercises"].as_array().unwrap().is_empty());
        assert_eq!(report["body"]["sleep"]["schedule"]["wake_time"], "07:00");
    }

    #[test]
    fn test_sleep_follows_latest_exercise() {
        // Logged out of order; 2024-01-02 is the most recent day
        let entries = r#"[
            {"date": "2024-01-02", "weight": 70.0, "exercise_minutes": 30},
            {"date": "2024-01-01", "weight": 70.2, "exercise_minutes": 120}
        ]"#;
        let report = parse(&recommend_json(RecommendationKind::Sleep, PROFILE, entries).unwrap());

        // 8.0 - 0.3 (age) + 0.4 (moderate) + 0.5 (30 minutes)
        let hours = report["body"]["sleep_hours"].as_f64().unwrap();
        assert!((hours - 8.6).abs() < 1e-9);

        let rested = r#"[
            {"date": "2024-01-01", "weight": 70.2, "exercise_minutes": 120},
            {"date": "2024-01-02", "weight": 70.0, "exercise_minutes": 0}
        ]"#;
        let report = parse(&recommend_json(RecommendationKind::Sleep, PROFILE, rested).unwrap());
        let hours = report["body"]["sleep_hours"].as_f64().unwrap();
        assert!((hours - 8.1).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_json() {
        let scenario = r#"{"sleep_hours": 8.0, "exercise_minutes": 45, "days": 30}"#;
        let report = parse(&simulate_json(PROFILE, ENTRIES, scenario).unwrap());
        assert_eq!(report["kind"], "simulation");
        assert_eq!(report["body"]["days_simulated"], 30);

        let invalid = r#"{"days": 0}"#;
        let err = simulate_json(PROFILE, ENTRIES, invalid).unwrap_err();
        assert!(matches!(err, InsightError::InvalidScenario(_)));
    }

    #[test]
    fn test_fill_calories_from_food_log() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut logged = HealthEntry::new(date, 70.0);
        logged.calories_consumed = Some(1800.0);
        let mut entries = vec![logged, HealthEntry::new(date.succ_opt().unwrap(), 69.9)];
        let foods = vec![
            FoodEntry {
                date,
                meal_type: MealType::Lunch,
                food_name: "rice".to_string(),
                quantity: 2.0,
                unit: "cup".to_string(),
                calories_per_unit: 200.0,
                protein_per_unit: 4.0,
                carbs_per_unit: 45.0,
                fats_per_unit: 0.5,
                fiber_per_unit: 1.0,
            },
            FoodEntry {
                date: date.succ_opt().unwrap(),
                meal_type: MealType::Dinner,
                food_name: "salmon".to_string(),
                quantity: 1.0,
                unit: "fillet".to_string(),
                calories_per_unit: 350.0,
                protein_per_unit: 34.0,
                carbs_per_unit: 0.0,
                fats_per_unit: 22.0,
                fiber_per_unit: 0.0,
            },
        ];

        fill_calories(&mut entries, &foods);
        assert_eq!(entries[0].calories_consumed, Some(1800.0));
        assert_eq!(entries[1].calories_consumed, Some(350.0));
    }

    #[test]
    fn test_processor_reuses_instance_id() {
        let processor = InsightProcessor::new();
        let first = processor.analyze_json(AnalysisKind::Habits, PROFILE, ENTRIES, None);
        let second = processor.recommend_json(RecommendationKind::Sleep, PROFILE, ENTRIES);
        let (first, second) = (parse(&first.unwrap()), parse(&second.unwrap()));
        assert_eq!(first["producer"]["instance_id"], second["producer"]["instance_id"]);
        assert_eq!(first["producer"]["instance_id"], processor.encoder().instance_id());
    }

    #[test]
    fn test_processor_config_applies() {
        let mut processor = InsightProcessor::new();
        processor.load_config(r#"{"wake_time": "06:30:00"}"#).unwrap();
        let report = processor.recommend_json(RecommendationKind::Sleep, PROFILE, ENTRIES);
        let report = parse(&report.unwrap());
        assert_eq!(report["body"]["schedule"]["wake_time"], "06:30");

        assert!(processor.load_config(r#"{"streak_gap_days": 0}"#).is_err());
    }
}

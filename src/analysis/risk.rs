//! Health risk assessment
//!
//! Two layers: threshold alerts on BMI, sleep and exercise, and weighted-factor
//! risk scores for a fixed set of lifestyle-related conditions.

use crate::aggregation::{mean, round_to};
use crate::types::{BehaviorField, HealthEntry, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Sleep assumed when none is logged
const DEFAULT_SLEEP_HOURS: f64 = 7.0;
/// Exercise frequency assumed without history
const DEFAULT_EXERCISE_FREQUENCY: f64 = 0.5;
/// Diet quality until food logs feed into it
const DEFAULT_DIET_QUALITY: f64 = 0.7;

/// Qualitative risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Level for a 0-100 risk score
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            RiskLevel::Low
        } else if score < 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Bmi,
    Sleep,
    Exercise,
}

/// A threshold-based health alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAlert {
    pub risk_level: RiskLevel,
    pub alert_type: AlertType,
    pub message: String,
    pub recommendations: Vec<String>,
}

impl RiskAlert {
    fn new(
        risk_level: RiskLevel,
        alert_type: AlertType,
        message: String,
        recommendations: &[&str],
    ) -> Self {
        Self {
            risk_level,
            alert_type,
            message,
            recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Conditions with a risk model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    Diabetes,
    Hypertension,
    Obesity,
    HeartDisease,
    Osteoporosis,
    Depression,
    SleepDisorder,
}

impl Disease {
    pub const ALL: [Disease; 7] = [
        Disease::Diabetes,
        Disease::Hypertension,
        Disease::Obesity,
        Disease::HeartDisease,
        Disease::Osteoporosis,
        Disease::Depression,
        Disease::SleepDisorder,
    ];

    /// Weighted-factor risk (0-1)
    pub fn risk(&self, f: &RiskFactors) -> f64 {
        let age = f.age / 80.0;
        let bmi = (f.bmi - 18.0) / 22.0;
        let inactivity = 1.0 - f.activity_index / 5.0;
        let low_exercise = 1.0 - f.exercise_frequency;
        let poor_diet = 1.0 - f.diet_quality;
        let short_sleep = 1.0 - f.avg_sleep_hours / 10.0;

        let risk = match self {
            Disease::Diabetes => age * 0.3 + bmi * 0.4 + inactivity * 0.2 + low_exercise * 0.1,
            Disease::Hypertension => {
                age * 0.3 + bmi * 0.3 + inactivity * 0.2 + f.family_history * 0.2
            }
            Disease::Obesity => bmi * 0.6 + inactivity * 0.3 + poor_diet * 0.1,
            Disease::HeartDisease => {
                age * 0.3
                    + bmi * 0.3
                    + inactivity * 0.2
                    + low_exercise * 0.1
                    + f.family_history * 0.1
            }
            Disease::Osteoporosis => {
                age * 0.4 + inactivity * 0.3 + low_exercise * 0.2 + poor_diet * 0.1
            }
            Disease::Depression => {
                short_sleep * 0.3 + inactivity * 0.3 + low_exercise * 0.2 + poor_diet * 0.2
            }
            Disease::SleepDisorder => short_sleep * 0.5 + bmi * 0.3 + inactivity * 0.2,
        };
        risk.clamp(0.0, 1.0)
    }

    fn factors(&self, profile: &UserProfile, f: &RiskFactors, sleep_logged: bool) -> Vec<String> {
        let bmi = f.bmi;
        let low_activity = profile.activity_level.is_low();
        let mut factors = Vec::new();

        match self {
            Disease::Diabetes => {
                if bmi > 25.0 {
                    factors.push(format!("High BMI ({bmi:.1}) increases diabetes risk"));
                }
                if f.age > 45.0 {
                    factors.push("Age is a risk factor for diabetes".to_string());
                }
                if low_activity {
                    factors.push("Low physical activity increases risk".to_string());
                }
            }
            Disease::Hypertension => {
                if bmi > 25.0 {
                    factors.push(format!("High BMI ({bmi:.1}) increases hypertension risk"));
                }
                if f.age > 40.0 {
                    factors.push("Age increases hypertension risk".to_string());
                }
                if low_activity {
                    factors.push("Lack of exercise contributes to hypertension".to_string());
                }
            }
            Disease::Obesity => {
                if bmi > 25.0 {
                    factors.push(format!("Current BMI ({bmi:.1}) indicates overweight/obesity"));
                }
                if low_activity {
                    factors.push("Low activity level contributes to weight gain".to_string());
                }
            }
            Disease::HeartDisease => {
                if bmi > 25.0 {
                    factors.push(format!("High BMI ({bmi:.1}) increases heart disease risk"));
                }
                if f.age > 50.0 {
                    factors.push("Age is a major risk factor".to_string());
                }
                if low_activity {
                    factors.push("Physical inactivity increases cardiovascular risk".to_string());
                }
            }
            Disease::SleepDisorder => {
                if sleep_logged && f.avg_sleep_hours < 6.0 {
                    factors.push(format!(
                        "Insufficient sleep ({:.1} hours) increases risk",
                        f.avg_sleep_hours
                    ));
                }
                if bmi > 25.0 {
                    factors.push("High BMI can affect sleep quality".to_string());
                }
            }
            Disease::Osteoporosis | Disease::Depression => {}
        }

        if factors.is_empty() {
            factors.push("Maintain healthy lifestyle to reduce risk".to_string());
        }
        factors
    }

    fn recommendations(&self, level: RiskLevel) -> &'static [&'static str] {
        use RiskLevel::*;
        match (self, level) {
            (Disease::Diabetes, Low) => {
                &["Maintain healthy weight", "Regular exercise", "Balanced diet"]
            }
            (Disease::Diabetes, Medium) => &[
                "Lose weight if overweight",
                "Increase physical activity",
                "Monitor blood sugar",
                "Reduce sugar intake",
            ],
            (Disease::Diabetes, High) => &[
                "Consult healthcare provider",
                "Weight management program",
                "Regular blood sugar monitoring",
                "Medication may be needed",
            ],
            (Disease::Hypertension, Low) => &[
                "Maintain healthy lifestyle",
                "Regular exercise",
                "Low sodium diet",
            ],
            (Disease::Hypertension, Medium) => &[
                "Reduce sodium intake",
                "Increase physical activity",
                "Monitor blood pressure",
                "Stress management",
            ],
            (Disease::Hypertension, High) => &[
                "Consult doctor immediately",
                "Blood pressure medication may be needed",
                "Lifestyle changes essential",
                "Regular monitoring",
            ],
            (Disease::Obesity, Low) => {
                &["Maintain current weight", "Regular exercise", "Balanced diet"]
            }
            (Disease::Obesity, Medium) => &[
                "Gradual weight loss",
                "Increase physical activity",
                "Calorie deficit",
                "Portion control",
            ],
            (Disease::Obesity, High) => &[
                "Consult nutritionist",
                "Structured weight loss program",
                "Regular exercise routine",
                "Medical supervision may be needed",
            ],
            (Disease::HeartDisease, Low) => &[
                "Maintain heart-healthy lifestyle",
                "Regular exercise",
                "Balanced diet",
            ],
            (Disease::HeartDisease, Medium) => &[
                "Improve diet quality",
                "Increase cardio exercise",
                "Reduce stress",
                "Regular health checkups",
            ],
            (Disease::HeartDisease, High) => &[
                "Consult cardiologist",
                "Immediate lifestyle changes",
                "Medication may be required",
                "Regular monitoring essential",
            ],
            (Disease::SleepDisorder, Low) => &[
                "Maintain sleep schedule",
                "Good sleep hygiene",
                "Regular exercise",
            ],
            (Disease::SleepDisorder, Medium) => &[
                "Improve sleep duration",
                "Sleep schedule consistency",
                "Reduce screen time before bed",
                "Consider sleep study",
            ],
            (Disease::SleepDisorder, High) => &[
                "Consult sleep specialist",
                "Sleep study recommended",
                "Address underlying causes",
                "Medical intervention may be needed",
            ],
            (Disease::Osteoporosis | Disease::Depression, _) => {
                &["Maintain healthy lifestyle", "Regular health checkups"]
            }
        }
    }
}

/// Model inputs derived from the profile and history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub age: f64,
    pub bmi: f64,
    /// Activity level ordinal (0-4)
    pub activity_index: f64,
    pub avg_sleep_hours: f64,
    /// Fraction of entries with exercise logged (0-1), 0.5 when none is logged
    pub exercise_frequency: f64,
    pub diet_quality: f64,
    /// 1.0 with a family history of the condition, else 0.0
    pub family_history: f64,
}

impl RiskFactors {
    pub fn from_history(profile: &UserProfile, entries: &[HealthEntry]) -> Self {
        let avg_sleep_hours =
            average_logged(entries, BehaviorField::Sleep).unwrap_or(DEFAULT_SLEEP_HOURS);
        let exercised = entries
            .iter()
            .filter(|e| BehaviorField::Exercise.value(e).is_some_and(|m| m > 0.0))
            .count();
        // No exercise logged at all reads as unknown
        let exercise_frequency = if exercised == 0 {
            DEFAULT_EXERCISE_FREQUENCY
        } else {
            exercised as f64 / entries.len() as f64
        };

        Self {
            age: profile.age as f64,
            bmi: profile.bmi(),
            activity_index: profile.activity_level.index() as f64,
            avg_sleep_hours,
            exercise_frequency,
            diet_quality: DEFAULT_DIET_QUALITY,
            family_history: 0.0,
        }
    }
}

/// Risk estimate for one condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRisk {
    /// Risk score (0-100)
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Combined alerts and per-condition risk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub alerts: Vec<RiskAlert>,
    pub disease_risks: BTreeMap<Disease, DiseaseRisk>,
    pub factors: RiskFactors,
}

/// Assess alerts and disease risks for a profile and its history
pub fn assess(profile: &UserProfile, entries: &[HealthEntry]) -> RiskAssessment {
    let factors = RiskFactors::from_history(profile, entries);
    let alerts = health_alerts(profile, entries);
    let sleep_logged = average_logged(entries, BehaviorField::Sleep).is_some();
    let disease_risks = disease_risks(profile, &factors, sleep_logged);

    debug!(
        alerts = alerts.len(),
        high = disease_risks.values().filter(|r| r.risk_level == RiskLevel::High).count(),
        "risk assessment"
    );

    RiskAssessment {
        alerts,
        disease_risks,
        factors,
    }
}

/// Threshold alerts on BMI, average sleep and average exercise
pub fn health_alerts(profile: &UserProfile, entries: &[HealthEntry]) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();
    let bmi = profile.bmi();

    if bmi < 18.5 {
        alerts.push(RiskAlert::new(
            RiskLevel::Medium,
            AlertType::Bmi,
            format!("Your BMI is {bmi:.1} (Underweight). Consider consulting a healthcare provider."),
            &["Increase calorie intake", "Focus on nutrient-dense foods", "Consult nutritionist"],
        ));
    } else if bmi > 30.0 {
        alerts.push(RiskAlert::new(
            RiskLevel::High,
            AlertType::Bmi,
            format!("Your BMI is {bmi:.1} (Obese). This increases risk of various health conditions."),
            &[
                "Weight loss program",
                "Regular exercise",
                "Consult healthcare provider",
                "Diet modification",
            ],
        ));
    } else if bmi > 25.0 {
        alerts.push(RiskAlert::new(
            RiskLevel::Medium,
            AlertType::Bmi,
            format!("Your BMI is {bmi:.1} (Overweight). Consider weight management."),
            &["Increase physical activity", "Calorie deficit", "Regular exercise"],
        ));
    }

    if entries.is_empty() {
        return alerts;
    }

    if let Some(avg_sleep) = average_logged(entries, BehaviorField::Sleep) {
        if avg_sleep < 6.0 {
            alerts.push(RiskAlert::new(
                RiskLevel::High,
                AlertType::Sleep,
                format!(
                    "Average sleep is only {avg_sleep:.1} hours. Chronic sleep deprivation increases disease risk."
                ),
                &[
                    "Improve sleep schedule",
                    "Aim for 7-9 hours",
                    "Sleep hygiene practices",
                    "Consult sleep specialist if persistent",
                ],
            ));
        } else if avg_sleep < 7.0 {
            alerts.push(RiskAlert::new(
                RiskLevel::Medium,
                AlertType::Sleep,
                format!("Average sleep is {avg_sleep:.1} hours. Aim for 7-9 hours for optimal health."),
                &[
                    "Improve sleep duration",
                    "Consistent sleep schedule",
                    "Better sleep hygiene",
                ],
            ));
        }
    }

    let exercise: Vec<f64> = entries
        .iter()
        .filter_map(|e| BehaviorField::Exercise.value(e))
        .filter(|m| *m > 0.0)
        .collect();
    match mean(&exercise) {
        Some(avg_exercise) if avg_exercise < 20.0 => alerts.push(RiskAlert::new(
            RiskLevel::High,
            AlertType::Exercise,
            format!(
                "Average exercise is only {avg_exercise:.0} minutes/day. Insufficient physical activity increases health risks."
            ),
            &[
                "Increase exercise to 30+ minutes daily",
                "Start with walking",
                "Gradually increase intensity",
                "Consult fitness trainer",
            ],
        )),
        Some(_) => {}
        None if profile.activity_level.is_low() => alerts.push(RiskAlert::new(
            RiskLevel::Medium,
            AlertType::Exercise,
            "Low activity level detected. Regular exercise is essential for health.".to_string(),
            &[
                "Start with 15-20 min daily",
                "Gradually increase",
                "Find activities you enjoy",
            ],
        )),
        None => {}
    }

    alerts
}

/// Risk per condition from precomputed factors
pub fn disease_risks(
    profile: &UserProfile,
    factors: &RiskFactors,
    sleep_logged: bool,
) -> BTreeMap<Disease, DiseaseRisk> {
    Disease::ALL
        .into_iter()
        .map(|disease| {
            let risk_score = round_to(disease.risk(factors) * 100.0, 1);
            let risk_level = RiskLevel::from_score(risk_score);
            let risk = DiseaseRisk {
                risk_score,
                risk_level,
                factors: disease.factors(profile, factors, sleep_logged),
                recommendations: disease
                    .recommendations(risk_level)
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            };
            (disease, risk)
        })
        .collect()
}

fn average_logged(entries: &[HealthEntry], field: BehaviorField) -> Option<f64> {
    let values: Vec<f64> = entries.iter().filter_map(|e| field.value(e)).collect();
    mean(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityLevel, Gender, HealthGoal};
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn make_profile(weight_kg: f64, activity_level: ActivityLevel) -> UserProfile {
        UserProfile {
            age: 50,
            gender: Gender::Male,
            height_cm: 175.0,
            weight_kg,
            activity_level,
            health_goal: HealthGoal::General,
            dietary_preference: Default::default(),
            allergies: vec![],
            medical_conditions: None,
        }
    }

    fn make_entries(sleep: f64, exercise: f64, count: usize) -> Vec<HealthEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| {
                let mut entry = HealthEntry::new(start + Duration::days(i as i64), 70.0);
                entry.sleep_hours = Some(sleep);
                entry.exercise_minutes = Some(exercise);
                entry
            })
            .collect()
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::High);
    }

    #[test]
    fn test_obese_short_sleeper_alerts() {
        // BMI 105 / 1.75^2 = 34.29
        let profile = make_profile(105.0, ActivityLevel::Moderate);
        let alerts = health_alerts(&profile, &make_entries(5.0, 10.0, 7));

        let kinds: Vec<(AlertType, RiskLevel)> =
            alerts.iter().map(|a| (a.alert_type, a.risk_level)).collect();
        assert_eq!(
            kinds,
            vec![
                (AlertType::Bmi, RiskLevel::High),
                (AlertType::Sleep, RiskLevel::High),
                (AlertType::Exercise, RiskLevel::High),
            ]
        );
        assert!(alerts[0].message.contains("34.3"));
    }

    #[test]
    fn test_no_exercise_with_low_activity() {
        let profile = make_profile(70.0, ActivityLevel::Sedentary);
        let alerts = health_alerts(&profile, &make_entries(7.5, 0.0, 3));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::Exercise);
        assert_eq!(alerts[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_healthy_profile_has_no_alerts() {
        let profile = make_profile(70.0, ActivityLevel::Active);
        assert!(health_alerts(&profile, &make_entries(8.0, 45.0, 5)).is_empty());
        assert!(health_alerts(&profile, &[]).is_empty());
    }

    #[test]
    fn test_factors_defaults_without_history() {
        let profile = make_profile(70.0, ActivityLevel::Moderate);
        let factors = RiskFactors::from_history(&profile, &[]);

        assert_eq!(factors.avg_sleep_hours, DEFAULT_SLEEP_HOURS);
        assert_eq!(factors.exercise_frequency, DEFAULT_EXERCISE_FREQUENCY);
        assert_eq!(factors.diet_quality, DEFAULT_DIET_QUALITY);
        assert_eq!(factors.activity_index, 2.0);
    }

    #[test]
    fn test_unlogged_exercise_uses_default_frequency() {
        let profile = make_profile(70.0, ActivityLevel::Moderate);

        let factors = RiskFactors::from_history(&profile, &make_entries(7.0, 0.0, 4));
        assert_eq!(factors.exercise_frequency, DEFAULT_EXERCISE_FREQUENCY);

        let mut entries = make_entries(7.0, 0.0, 4);
        entries[0].exercise_minutes = Some(30.0);
        let factors = RiskFactors::from_history(&profile, &entries);
        assert!((factors.exercise_frequency - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_obesity_risk_formula() {
        let factors = RiskFactors {
            age: 40.0,
            bmi: 29.0,
            activity_index: 0.0,
            avg_sleep_hours: 7.0,
            exercise_frequency: 0.0,
            diet_quality: 0.5,
            family_history: 0.0,
        };
        // 0.5 * 0.6 + 1.0 * 0.3 + 0.5 * 0.1
        assert!((Disease::Obesity.risk(&factors) - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_assessment_covers_every_disease() {
        let profile = make_profile(95.0, ActivityLevel::Sedentary);
        let assessment = assess(&profile, &make_entries(5.5, 0.0, 10));

        assert_eq!(assessment.disease_risks.len(), Disease::ALL.len());
        for risk in assessment.disease_risks.values() {
            assert!((0.0..=100.0).contains(&risk.risk_score));
            assert!(!risk.factors.is_empty());
            assert!(!risk.recommendations.is_empty());
        }

        let sleep = &assessment.disease_risks[&Disease::SleepDisorder];
        assert_eq!(sleep.factors[0], "Insufficient sleep (5.5 hours) increases risk");

        let depression = &assessment.disease_risks[&Disease::Depression];
        assert_eq!(
            depression.recommendations,
            vec!["Maintain healthy lifestyle".to_string(), "Regular health checkups".to_string()]
        );
    }
}

//! Core types for health insights
//!
//! This module defines the records every analysis consumes: the user profile
//! with its derived body metrics, dated health entries, and food entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Biological sex used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M", alias = "male")]
    Male,
    #[serde(rename = "F", alias = "female")]
    Female,
    #[serde(rename = "O", alias = "other")]
    Other,
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Ordinal position from sedentary (0) to very active (4)
    pub fn index(&self) -> u8 {
        match self {
            ActivityLevel::Sedentary => 0,
            ActivityLevel::Light => 1,
            ActivityLevel::Moderate => 2,
            ActivityLevel::Active => 3,
            ActivityLevel::VeryActive => 4,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Sedentary and lightly active users count as low activity
    pub fn is_low(&self) -> bool {
        matches!(self, ActivityLevel::Sedentary | ActivityLevel::Light)
    }
}

/// Primary health goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGoal {
    WeightLoss,
    MuscleGain,
    Maintenance,
    #[default]
    General,
}

impl HealthGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthGoal::WeightLoss => "weight_loss",
            HealthGoal::MuscleGain => "muscle_gain",
            HealthGoal::Maintenance => "maintenance",
            HealthGoal::General => "general",
        }
    }

    /// Goals that involve a deliberate change in body weight
    pub fn targets_weight(&self) -> bool {
        matches!(self, HealthGoal::WeightLoss | HealthGoal::MuscleGain)
    }
}

/// Dietary preference used when choosing meals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    #[default]
    None,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
}

/// User profile with the static inputs every analysis needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height_cm: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub health_goal: HealthGoal,
    #[serde(default)]
    pub dietary_preference: DietaryPreference,
    /// Known food allergies, matched case-insensitively against meal names
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
}

impl UserProfile {
    /// Body mass index, rounded to two decimals
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        if height_m <= 0.0 {
            return 0.0;
        }
        round2(self.weight_kg / (height_m * height_m))
    }

    /// Basal metabolic rate (Mifflin-St Jeor), kcal/day
    pub fn bmr(&self) -> f64 {
        let base = 10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * self.age as f64;
        let offset = match self.gender {
            Gender::Male => 5.0,
            Gender::Female | Gender::Other => -161.0,
        };
        round2(base + offset)
    }

    /// Total daily energy expenditure, kcal/day
    pub fn tdee(&self) -> f64 {
        round2(self.bmr() * self.activity_level.multiplier())
    }
}

/// One day of logged health metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub date: NaiveDate,
    /// Body weight in kilograms
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_consumed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_intake_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl HealthEntry {
    /// Entry with only the mandatory fields set
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self {
            date,
            weight,
            sleep_hours: None,
            exercise_minutes: None,
            calories_consumed: None,
            water_intake_liters: None,
            notes: String::new(),
        }
    }
}

/// Behavior series that can be correlated against weight change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorField {
    Sleep,
    Exercise,
    Calories,
}

impl BehaviorField {
    pub const ALL: [BehaviorField; 3] = [
        BehaviorField::Sleep,
        BehaviorField::Exercise,
        BehaviorField::Calories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorField::Sleep => "sleep",
            BehaviorField::Exercise => "exercise",
            BehaviorField::Calories => "calories",
        }
    }

    /// Logged value for this behavior; zero is treated as not logged
    pub fn value(&self, entry: &HealthEntry) -> Option<f64> {
        let raw = match self {
            BehaviorField::Sleep => entry.sleep_hours,
            BehaviorField::Exercise => entry.exercise_minutes,
            BehaviorField::Calories => entry.calories_consumed,
        };
        raw.filter(|v| *v != 0.0)
    }
}

/// Meal slot for a food entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

/// A single food item eaten on a given day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_name: String,
    /// Quantity in `unit`s
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub calories_per_unit: f64,
    #[serde(default)]
    pub protein_per_unit: f64,
    #[serde(default)]
    pub carbs_per_unit: f64,
    #[serde(default)]
    pub fats_per_unit: f64,
    #[serde(default)]
    pub fiber_per_unit: f64,
}

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> String {
    "serving".to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

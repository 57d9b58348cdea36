//! Input validation for profiles and health records
//!
//! Bounds mirror what a person can plausibly log: weights between 20 and 300 kg,
//! at most 24 hours of sleep, non-negative exercise and calorie counts.

use crate::types::{FoodEntry, HealthEntry, UserProfile};

/// Schema identifier for health entry input
pub const SCHEMA_VERSION: &str = "health.entry.v1";

pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 300.0);
pub const HEIGHT_RANGE_CM: (f64, f64) = (50.0, 250.0);
pub const AGE_RANGE_YEARS: (u32, u32) = (1, 120);
pub const SLEEP_RANGE_HOURS: (f64, f64) = (0.0, 24.0);
pub const WATER_RANGE_LITERS: (f64, f64) = (0.0, 10.0);

/// Validation errors for input records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be within {min}-{max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Records that can check their own bounds
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for HealthEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        check_range("weight", self.weight, WEIGHT_RANGE_KG)?;
        if let Some(sleep) = self.sleep_hours {
            check_range("sleep_hours", sleep, SLEEP_RANGE_HOURS)?;
        }
        if let Some(exercise) = self.exercise_minutes {
            check_non_negative("exercise_minutes", exercise)?;
        }
        if let Some(calories) = self.calories_consumed {
            check_non_negative("calories_consumed", calories)?;
        }
        if let Some(water) = self.water_intake_liters {
            check_range("water_intake_liters", water, WATER_RANGE_LITERS)?;
        }
        Ok(())
    }
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        let (min_age, max_age) = AGE_RANGE_YEARS;
        if !(min_age..=max_age).contains(&self.age) {
            return Err(ValidationError::OutOfRange {
                field: "age",
                value: self.age as f64,
                min: min_age as f64,
                max: max_age as f64,
            });
        }
        check_range("height_cm", self.height_cm, HEIGHT_RANGE_CM)?;
        check_range("weight_kg", self.weight_kg, WEIGHT_RANGE_KG)?;
        Ok(())
    }
}

impl Validate for FoodEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.food_name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "food_name" });
        }
        check_non_negative("quantity", self.quantity)?;
        for (field, value) in [
            ("calories_per_unit", self.calories_per_unit),
            ("protein_per_unit", self.protein_per_unit),
            ("carbs_per_unit", self.carbs_per_unit),
            ("fats_per_unit", self.fats_per_unit),
            ("fiber_per_unit", self.fiber_per_unit),
        ] {
            check_non_negative(field, value)?;
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Gender, MealType};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_valid_entry() {
        let mut entry = HealthEntry::new(date(), 72.5);
        entry.sleep_hours = Some(7.5);
        entry.exercise_minutes = Some(45.0);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_entry_out_of_range() {
        let entry = HealthEntry::new(date(), 15.0);
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::OutOfRange { field: "weight", .. })
        ));

        let mut entry = HealthEntry::new(date(), 70.0);
        entry.sleep_hours = Some(25.0);
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::OutOfRange { field: "sleep_hours", .. })
        ));

        let mut entry = HealthEntry::new(date(), 70.0);
        entry.exercise_minutes = Some(-5.0);
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::Negative { field: "exercise_minutes", .. })
        ));
    }

    #[test]
    fn test_entry_rejects_nan() {
        let entry = HealthEntry::new(date(), f64::NAN);
        assert_eq!(
            entry.validate(),
            Err(ValidationError::NotFinite { field: "weight" })
        );
    }

    #[test]
    fn test_profile_bounds() {
        let mut profile = UserProfile {
            age: 0,
            gender: Gender::Male,
            height_cm: 180.0,
            weight_kg: 80.0,
            activity_level: Default::default(),
            health_goal: Default::default(),
            dietary_preference: Default::default(),
            allergies: vec![],
            medical_conditions: None,
        };
        assert!(profile.validate().is_err());

        profile.age = 35;
        assert!(profile.validate().is_ok());

        profile.height_cm = 300.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_food_entry_requires_name() {
        let food = FoodEntry {
            date: date(),
            meal_type: MealType::Lunch,
            food_name: "  ".to_string(),
            quantity: 1.0,
            unit: "serving".to_string(),
            calories_per_unit: 100.0,
            protein_per_unit: 0.0,
            carbs_per_unit: 0.0,
            fats_per_unit: 0.0,
            fiber_per_unit: 0.0,
        };
        assert_eq!(
            food.validate(),
            Err(ValidationError::Empty { field: "food_name" })
        );
    }
}

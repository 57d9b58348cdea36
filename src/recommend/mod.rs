//! Personalized recommendations
//!
//! Diet, exercise and sleep plans derived from the user profile.

pub mod diet;
pub mod exercise;
pub mod sleep;

pub use diet::{recommend_diet, DietRecommendation, Macronutrients, Meal, MealPlan};
pub use exercise::{
    recommend_exercise, Exercise, ExerciseCategory, ExerciseRecommendation, FitnessLevel,
};
pub use sleep::{recommend_sleep, SleepRecommendation, SleepSchedule};

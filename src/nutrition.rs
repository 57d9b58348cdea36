//! Nutrition totals from food entries
//!
//! Each food entry contributes its per-unit values times quantity. Entries are
//! summed per day, overall and per meal slot.

use crate::aggregation::round_to;
use crate::types::{FoodEntry, MealType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Calories and macronutrients (grams)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub fiber: f64,
}

impl NutritionTotals {
    /// Every field rounded to two decimals
    pub fn rounded(&self) -> Self {
        Self {
            calories: round_to(self.calories, 2),
            protein: round_to(self.protein, 2),
            carbs: round_to(self.carbs, 2),
            fats: round_to(self.fats, 2),
            fiber: round_to(self.fiber, 2),
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fats += rhs.fats;
        self.fiber += rhs.fiber;
    }
}

impl FoodEntry {
    /// Totals for the logged quantity, rounded to two decimals
    pub fn totals(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories_per_unit * self.quantity,
            protein: self.protein_per_unit * self.quantity,
            carbs: self.carbs_per_unit * self.quantity,
            fats: self.fats_per_unit * self.quantity,
            fiber: self.fiber_per_unit * self.quantity,
        }
        .rounded()
    }
}

/// Nutrition eaten on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    pub by_meal: BTreeMap<MealType, NutritionTotals>,
    pub food_count: usize,
}

/// Aggregate food entries per day, ordered by date
pub fn daily_nutrition(foods: &[FoodEntry]) -> Vec<DailyNutrition> {
    let mut days: BTreeMap<NaiveDate, DailyNutrition> = BTreeMap::new();

    for food in foods {
        let totals = food.totals();
        let day = days.entry(food.date).or_insert_with(|| DailyNutrition {
            date: food.date,
            totals: NutritionTotals::default(),
            by_meal: BTreeMap::new(),
            food_count: 0,
        });
        day.totals += totals;
        *day.by_meal.entry(food.meal_type).or_default() += totals;
        day.food_count += 1;
    }

    days.into_values()
        .map(|mut day| {
            day.totals = day.totals.rounded();
            for totals in day.by_meal.values_mut() {
                *totals = totals.rounded();
            }
            day
        })
        .collect()
}

/// Total calories per day, for filling days without a logged calorie count
pub fn calories_by_date(foods: &[FoodEntry]) -> BTreeMap<NaiveDate, f64> {
    daily_nutrition(foods)
        .into_iter()
        .map(|day| (day.date, day.totals.calories))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn food(
        day: u32,
        meal_type: MealType,
        quantity: f64,
        calories: f64,
        protein: f64,
    ) -> FoodEntry {
        FoodEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            meal_type,
            food_name: "test food".to_string(),
            quantity,
            unit: "serving".to_string(),
            calories_per_unit: calories,
            protein_per_unit: protein,
            carbs_per_unit: 10.0,
            fats_per_unit: 1.5,
            fiber_per_unit: 2.0,
        }
    }

    #[test]
    fn test_entry_totals_scale_with_quantity() {
        let totals = food(1, MealType::Lunch, 1.5, 200.0, 12.0).totals();
        assert_eq!(
            totals,
            NutritionTotals {
                calories: 300.0,
                protein: 18.0,
                carbs: 15.0,
                fats: 2.25,
                fiber: 3.0,
            }
        );
    }

    #[test]
    fn test_daily_aggregation() {
        let foods = vec![
            food(2, MealType::Dinner, 1.0, 500.0, 30.0),
            food(1, MealType::Breakfast, 2.0, 150.0, 5.0),
            food(1, MealType::Breakfast, 1.0, 100.0, 3.0),
            food(1, MealType::Snacks, 1.0, 90.0, 2.0),
        ];
        let days = daily_nutrition(&foods);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(days[0].food_count, 3);
        assert_eq!(days[0].totals.calories, 490.0);
        assert_eq!(days[0].totals.protein, 15.0);
        assert_eq!(days[0].by_meal[&MealType::Breakfast].calories, 400.0);
        assert_eq!(days[0].by_meal.len(), 2);
        assert_eq!(days[1].totals.calories, 500.0);
    }

    #[test]
    fn test_calories_by_date() {
        let foods = vec![food(3, MealType::Lunch, 1.0, 650.0, 20.0)];
        let calories = calories_by_date(&foods);
        assert_eq!(calories[&NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()], 650.0);
        assert!(calories_by_date(&[]).is_empty());
    }
}

//! Diet recommendation
//!
//! Daily calorie target from TDEE and goal, a macronutrient split, and a
//! sample meal plan drawn from a small built-in menu.

use crate::aggregation::round_to;
use crate::types::{DietaryPreference, Gender, HealthGoal, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

const WEIGHT_LOSS_DEFICIT: f64 = 500.0;
const MUSCLE_GAIN_SURPLUS: f64 = 400.0;
const MIN_CALORIES_FEMALE: f64 = 1200.0;
const MIN_CALORIES_DEFAULT: f64 = 1500.0;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Macronutrient targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macronutrients {
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fats_grams: f64,
    pub protein_percent: u32,
    pub carbs_percent: u32,
    pub fats_percent: u32,
}

/// A suggested meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// One day of suggested meals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub breakfast: Option<Meal>,
    pub lunch: Option<Meal>,
    pub dinner: Option<Meal>,
    pub snacks: Vec<Meal>,
    pub total_calories: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietRecommendation {
    /// Daily calorie target
    pub calories: f64,
    pub macronutrients: Macronutrients,
    pub meal_plan: MealPlan,
    pub tdee: f64,
    pub bmr: f64,
}

struct MenuItem {
    name: &'static str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
}

macro_rules! item {
    ($name:expr, $calories:expr, $protein:expr, $carbs:expr, $fats:expr) => {
        MenuItem {
            name: $name,
            calories: $calories,
            protein: $protein,
            carbs: $carbs,
            fats: $fats,
        }
    };
}

impl MenuItem {
    fn to_meal(&self) -> Meal {
        Meal {
            name: self.name.to_string(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
        }
    }
}

struct Menu {
    breakfast: &'static [MenuItem],
    lunch: &'static [MenuItem],
    dinner: &'static [MenuItem],
}

static STANDARD_MENU: Menu = Menu {
    breakfast: &[
        item!("Poha (Flattened Rice) with vegetables", 320.0, 8.0, 60.0, 8.0),
        item!("Upma (Semolina) with vegetables", 350.0, 10.0, 65.0, 10.0),
        item!("Paratha with curd and pickle", 380.0, 12.0, 55.0, 15.0),
        item!("Idli with sambar and chutney", 300.0, 10.0, 58.0, 6.0),
        item!("Dosa with sambar", 340.0, 9.0, 62.0, 8.0),
        item!("Aloo Paratha with butter", 420.0, 11.0, 60.0, 18.0),
        item!("Besan Chilla (Gram flour pancake)", 280.0, 14.0, 40.0, 10.0),
        item!("Moong Dal Cheela with vegetables", 290.0, 15.0, 38.0, 9.0),
        item!("Rava Upma with peanuts", 360.0, 11.0, 68.0, 11.0),
        item!("Vermicelli Upma (Semiya)", 330.0, 8.0, 64.0, 9.0),
        item!("Oatmeal with fruits", 300.0, 8.0, 55.0, 6.0),
        item!("Scrambled eggs with toast", 350.0, 18.0, 30.0, 15.0),
        item!("Greek yogurt with berries", 250.0, 15.0, 30.0, 5.0),
    ],
    lunch: &[
        item!("Grilled chicken salad", 400.0, 35.0, 20.0, 18.0),
        item!("Salmon with vegetables", 450.0, 30.0, 25.0, 22.0),
        item!("Quinoa bowl with vegetables", 380.0, 12.0, 60.0, 10.0),
    ],
    dinner: &[
        item!("Lean beef with sweet potato", 500.0, 40.0, 45.0, 15.0),
        item!("Baked fish with rice", 420.0, 35.0, 50.0, 12.0),
        item!("Turkey stir-fry", 450.0, 38.0, 40.0, 16.0),
    ],
};

static VEGETARIAN_MENU: Menu = Menu {
    breakfast: &[
        item!("Poha with peanuts and vegetables", 320.0, 9.0, 62.0, 9.0),
        item!("Upma with vegetables and cashews", 360.0, 11.0, 67.0, 11.0),
        item!("Aloo Paratha with curd", 400.0, 12.0, 58.0, 16.0),
        item!("Idli with sambar and coconut chutney", 310.0, 11.0, 60.0, 7.0),
        item!("Masala Dosa with sambar", 350.0, 10.0, 64.0, 9.0),
        item!("Besan Chilla with mint chutney", 290.0, 15.0, 42.0, 11.0),
        item!("Moong Dal Cheela with tomato chutney", 300.0, 16.0, 40.0, 10.0),
        item!("Rava Idli with sambar", 320.0, 10.0, 61.0, 8.0),
        item!("Vegetable Paratha with pickle", 380.0, 11.0, 56.0, 15.0),
        item!("Vermicelli Upma with vegetables", 340.0, 9.0, 66.0, 10.0),
        item!("Vegetable omelet", 280.0, 15.0, 20.0, 16.0),
        item!("Avocado toast", 320.0, 10.0, 40.0, 14.0),
    ],
    lunch: &[
        item!("Lentil curry with rice", 420.0, 18.0, 65.0, 10.0),
        item!("Chickpea salad", 380.0, 16.0, 50.0, 12.0),
    ],
    dinner: &[
        item!("Tofu stir-fry", 400.0, 20.0, 45.0, 14.0),
        item!("Vegetable pasta", 450.0, 12.0, 70.0, 12.0),
    ],
};

static VEGAN_MENU: Menu = Menu {
    breakfast: &[
        item!("Smoothie bowl", 300.0, 8.0, 60.0, 6.0),
        item!("Avocado toast", 320.0, 10.0, 40.0, 14.0),
    ],
    lunch: &[
        item!("Quinoa salad", 400.0, 14.0, 65.0, 10.0),
        item!("Lentil soup", 350.0, 16.0, 55.0, 8.0),
    ],
    dinner: &[
        item!("Vegan curry with rice", 450.0, 12.0, 75.0, 12.0),
        item!("Stuffed bell peppers", 380.0, 10.0, 60.0, 10.0),
    ],
};

static SNACKS: &[MenuItem] = &[
    item!("Apple with almond butter", 200.0, 5.0, 25.0, 10.0),
    item!("Mixed nuts", 150.0, 5.0, 5.0, 12.0),
];

impl DietaryPreference {
    fn menu(&self) -> &'static Menu {
        match self {
            DietaryPreference::Vegetarian => &VEGETARIAN_MENU,
            DietaryPreference::Vegan => &VEGAN_MENU,
            DietaryPreference::None | DietaryPreference::Keto | DietaryPreference::Paleo => {
                &STANDARD_MENU
            }
        }
    }
}

/// Build a diet recommendation for a profile
pub fn recommend_diet(profile: &UserProfile) -> DietRecommendation {
    let tdee = profile.tdee();
    let calories = daily_calories(tdee, profile.health_goal, profile.gender);
    let macronutrients = macronutrients(calories, profile.health_goal);
    let meal_plan = meal_plan(calories, profile.dietary_preference, &profile.allergies);

    debug!(
        tdee,
        calories,
        goal = profile.health_goal.as_str(),
        "diet recommendation"
    );

    DietRecommendation {
        calories,
        macronutrients,
        meal_plan,
        tdee,
        bmr: profile.bmr(),
    }
}

/// Goal-adjusted calorie target with a gender-specific floor, whole kcal
pub fn daily_calories(tdee: f64, goal: HealthGoal, gender: Gender) -> f64 {
    let target = match goal {
        HealthGoal::WeightLoss => tdee - WEIGHT_LOSS_DEFICIT,
        HealthGoal::MuscleGain => tdee + MUSCLE_GAIN_SURPLUS,
        HealthGoal::Maintenance | HealthGoal::General => tdee,
    };
    let floor = match gender {
        Gender::Female => MIN_CALORIES_FEMALE,
        Gender::Male | Gender::Other => MIN_CALORIES_DEFAULT,
    };
    target.round().max(floor)
}

/// Protein/carb/fat split for a calorie target
pub fn macronutrients(calories: f64, goal: HealthGoal) -> Macronutrients {
    let (protein, carbs, fats) = match goal {
        HealthGoal::WeightLoss => (30, 35, 35),
        HealthGoal::MuscleGain => (35, 40, 25),
        HealthGoal::Maintenance | HealthGoal::General => (25, 45, 30),
    };
    let grams = |percent: u32, kcal_per_gram: f64| {
        round_to(calories * percent as f64 / 100.0 / kcal_per_gram, 1)
    };

    Macronutrients {
        protein_grams: grams(protein, KCAL_PER_GRAM_PROTEIN),
        carbs_grams: grams(carbs, KCAL_PER_GRAM_CARBS),
        fats_grams: grams(fats, KCAL_PER_GRAM_FAT),
        protein_percent: protein,
        carbs_percent: carbs,
        fats_percent: fats,
    }
}

/// Deterministic meal plan. The calorie target picks the starting option in
/// each slot; options naming an allergen are skipped.
pub fn meal_plan(calories: f64, preference: DietaryPreference, allergies: &[String]) -> MealPlan {
    let allergens: Vec<String> = allergies
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();
    let allowed = |item: &MenuItem| {
        let name = item.name.to_lowercase();
        !allergens.iter().any(|a| name.contains(a.as_str()))
    };
    let seed = (calories.max(0.0) / 100.0) as usize;
    let pick = |options: &[MenuItem]| -> Option<Meal> {
        (0..options.len())
            .map(|offset| &options[(seed + offset) % options.len()])
            .find(|item| allowed(*item))
            .map(MenuItem::to_meal)
    };

    let menu = preference.menu();
    let breakfast = pick(menu.breakfast);
    let lunch = pick(menu.lunch);
    let dinner = pick(menu.dinner);
    let snacks: Vec<Meal> = SNACKS
        .iter()
        .filter(|item| allowed(*item))
        .map(MenuItem::to_meal)
        .collect();

    let total_calories: f64 = [&breakfast, &lunch, &dinner]
        .into_iter()
        .flatten()
        .chain(snacks.iter())
        .map(|m| m.calories)
        .sum();

    MealPlan {
        breakfast,
        lunch,
        dinner,
        snacks,
        total_calories,
    }
}

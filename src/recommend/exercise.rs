//! Exercise recommendation
//!
//! Picks a workout category from the goal and fills the available time from a
//! catalog graded by fitness level.

use crate::types::{ActivityLevel, HealthGoal, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Duration assumed for exercises measured in sets and reps
const DEFAULT_EXERCISE_MINUTES: u32 = 15;
const MAX_EXERCISES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<ActivityLevel> for FitnessLevel {
    fn from(level: ActivityLevel) -> Self {
        match level {
            ActivityLevel::Sedentary | ActivityLevel::Light => FitnessLevel::Beginner,
            ActivityLevel::Moderate => FitnessLevel::Intermediate,
            ActivityLevel::Active | ActivityLevel::VeryActive => FitnessLevel::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Cardio,
    Strength,
    Mixed,
}

impl From<HealthGoal> for ExerciseCategory {
    fn from(goal: HealthGoal) -> Self {
        match goal {
            HealthGoal::WeightLoss => ExerciseCategory::Cardio,
            HealthGoal::MuscleGain => ExerciseCategory::Strength,
            HealthGoal::Maintenance | HealthGoal::General => ExerciseCategory::Mixed,
        }
    }
}

/// A recommended exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub intensity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Estimated calories burned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<String>,
}

impl Exercise {
    /// Minutes this exercise takes out of the session
    pub fn minutes(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_EXERCISE_MINUTES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecommendation {
    pub fitness_level: FitnessLevel,
    pub exercise_type: ExerciseCategory,
    pub exercises: Vec<Exercise>,
    /// Minutes covered by the selected exercises
    pub total_duration: u32,
    pub available_time: u32,
    pub frequency: String,
}

enum Dose {
    Timed { minutes: u32, calories: Option<u32> },
    Sets { sets: u32, reps: u32 },
}

struct CatalogEntry {
    name: &'static str,
    intensity: &'static str,
    dose: Dose,
    components: &'static [&'static str],
}

const fn cardio(
    name: &'static str,
    minutes: u32,
    intensity: &'static str,
    calories: u32,
) -> CatalogEntry {
    CatalogEntry {
        name,
        intensity,
        dose: Dose::Timed {
            minutes,
            calories: Some(calories),
        },
        components: &[],
    }
}

const fn strength(
    name: &'static str,
    sets: u32,
    reps: u32,
    intensity: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        name,
        intensity,
        dose: Dose::Sets { sets, reps },
        components: &[],
    }
}

/// Held position measured in minutes rather than sets
const fn hold(name: &'static str, minutes: u32, intensity: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        intensity,
        dose: Dose::Timed {
            minutes,
            calories: None,
        },
        components: &[],
    }
}

const fn circuit(
    name: &'static str,
    minutes: u32,
    intensity: &'static str,
    components: &'static [&'static str],
) -> CatalogEntry {
    CatalogEntry {
        name,
        intensity,
        dose: Dose::Timed {
            minutes,
            calories: None,
        },
        components,
    }
}

impl CatalogEntry {
    fn to_exercise(&self) -> Exercise {
        let (duration, sets, reps, calories) = match self.dose {
            Dose::Timed { minutes, calories } => (Some(minutes), None, None, calories),
            Dose::Sets { sets, reps } => (None, Some(sets), Some(reps), None),
        };
        Exercise {
            name: self.name.to_string(),
            intensity: self.intensity.to_string(),
            duration,
            sets,
            reps,
            calories,
            exercises: self.components.iter().map(|s| s.to_string()).collect(),
        }
    }
}

static BEGINNER_CARDIO: &[CatalogEntry] = &[
    cardio("Brisk Walking", 30, "Low", 150),
    cardio("Cycling (Easy)", 25, "Low", 120),
    cardio("Swimming (Leisurely)", 20, "Low", 100),
    cardio("Jogging (Slow pace)", 20, "Low", 140),
    cardio("Dancing", 25, "Low", 130),
    cardio("Stair Climbing", 15, "Low", 110),
    cardio("Elliptical Trainer", 25, "Low", 125),
    cardio("Yoga Flow", 30, "Low", 90),
    cardio("Tai Chi", 30, "Low", 80),
    cardio("Pilates", 30, "Low", 100),
    cardio("Water Aerobics", 30, "Low", 120),
    cardio("Hiking (Easy trail)", 40, "Low", 180),
];

static BEGINNER_STRENGTH: &[CatalogEntry] = &[
    strength("Bodyweight Squats", 3, 10, "Low"),
    strength("Push-ups (Knee)", 3, 8, "Low"),
    hold("Plank", 30, "Low"),
    strength("Wall Push-ups", 3, 12, "Low"),
    strength("Lunges", 2, 8, "Low"),
    strength("Glute Bridges", 3, 12, "Low"),
    strength("Bird Dog", 2, 10, "Low"),
    strength("Modified Burpees", 2, 5, "Low"),
    strength("Calf Raises", 3, 15, "Low"),
    strength("Leg Raises", 2, 10, "Low"),
    strength("Superman", 2, 10, "Low"),
    hold("Wall Sit", 30, "Low"),
];

static BEGINNER_MIXED: &[CatalogEntry] = &[
    circuit("Full Body Circuit", 20, "Low", &["Squats", "Push-ups", "Lunges"]),
    circuit("Beginner HIIT", 15, "Low", &["Jumping Jacks", "Squats", "Plank"]),
    circuit("Yoga Strength Flow", 25, "Low", &["Warrior Poses", "Plank", "Downward Dog"]),
];

static INTERMEDIATE_CARDIO: &[CatalogEntry] = &[
    cardio("Running (Moderate)", 30, "Moderate", 300),
    cardio("Cycling (Moderate)", 35, "Moderate", 280),
    cardio("HIIT Workout", 25, "High", 350),
    cardio("Rowing Machine", 25, "Moderate", 290),
    cardio("Jump Rope", 20, "Moderate", 250),
    cardio("Swimming Laps", 30, "Moderate", 320),
    cardio("Treadmill Running", 30, "Moderate", 310),
    cardio("Dance Cardio", 30, "Moderate", 280),
    cardio("Kickboxing", 30, "Moderate", 350),
    cardio("Zumba", 30, "Moderate", 300),
    cardio("Spinning Class", 30, "Moderate", 320),
    cardio("StairMaster", 25, "Moderate", 290),
    cardio("Rowing (Moderate)", 30, "Moderate", 310),
    cardio("Aerobics Class", 30, "Moderate", 280),
];

static INTERMEDIATE_STRENGTH: &[CatalogEntry] = &[
    strength("Squats", 4, 12, "Moderate"),
    strength("Push-ups", 4, 15, "Moderate"),
    strength("Deadlifts", 3, 10, "Moderate"),
    strength("Pull-ups/Chin-ups", 3, 8, "Moderate"),
    strength("Dumbbell Rows", 3, 12, "Moderate"),
    strength("Overhead Press", 3, 10, "Moderate"),
    strength("Lunges (Weighted)", 3, 12, "Moderate"),
    strength("Bench Press", 3, 10, "Moderate"),
    strength("Leg Press", 3, 15, "Moderate"),
    strength("Bicep Curls", 3, 12, "Moderate"),
    strength("Tricep Dips", 3, 10, "Moderate"),
    strength("Shoulder Press", 3, 10, "Moderate"),
    strength("Chest Flyes", 3, 12, "Moderate"),
    strength("Leg Curls", 3, 12, "Moderate"),
    strength("Calf Raises (Weighted)", 3, 15, "Moderate"),
];

static INTERMEDIATE_MIXED: &[CatalogEntry] = &[
    circuit("CrossFit-style Workout", 30, "Moderate", &[]),
    circuit(
        "Circuit Training",
        30,
        "Moderate",
        &["Squats", "Push-ups", "Burpees", "Plank"],
    ),
    circuit(
        "Tabata Workout",
        20,
        "High",
        &["Squat Jumps", "Push-ups", "Mountain Climbers"],
    ),
    circuit("Full Body Strength + Cardio", 35, "Moderate", &[]),
];

static ADVANCED_CARDIO: &[CatalogEntry] = &[
    cardio("Running (Fast)", 40, "High", 500),
    cardio("Cycling (Intense)", 45, "High", 450),
    cardio("HIIT Advanced", 30, "Very High", 600),
    cardio("Sprint Intervals", 25, "Very High", 550),
    cardio("Rowing (Intense)", 30, "High", 480),
    cardio("Swimming (Intense)", 35, "High", 500),
    cardio("Boxing Training", 40, "High", 550),
    cardio("Mountain Biking", 45, "High", 520),
    cardio("Trail Running", 45, "High", 530),
    cardio("Spin Class (Intense)", 40, "High", 500),
    cardio("MMA Training", 40, "Very High", 580),
    cardio("CrossFit Cardio", 30, "Very High", 600),
];

static ADVANCED_STRENGTH: &[CatalogEntry] = &[
    strength("Weighted Squats", 5, 8, "High"),
    strength("Bench Press", 4, 6, "High"),
    strength("Deadlifts (Heavy)", 4, 5, "High"),
    strength("Barbell Rows", 4, 8, "High"),
    strength("Overhead Press (Heavy)", 4, 6, "High"),
    strength("Pull-ups (Weighted)", 4, 8, "High"),
    strength("Leg Press (Heavy)", 4, 10, "High"),
    strength("Romanian Deadlifts", 4, 8, "High"),
    strength("Dips (Weighted)", 4, 8, "High"),
    strength("Barbell Curls", 4, 8, "High"),
    strength("Front Squats", 4, 6, "High"),
    strength("Incline Bench Press", 4, 8, "High"),
    strength("Barbell Hip Thrusts", 4, 8, "High"),
    strength("Military Press", 4, 6, "High"),
    strength("T-Bar Rows", 4, 8, "High"),
];

static ADVANCED_MIXED: &[CatalogEntry] = &[
    circuit("Advanced Circuit Training", 40, "High", &[]),
    circuit(
        "CrossFit WOD",
        30,
        "Very High",
        &["Thrusters", "Pull-ups", "Box Jumps"],
    ),
    circuit(
        "Advanced HIIT",
        35,
        "Very High",
        &["Burpees", "Sprint", "Kettlebell Swings"],
    ),
    circuit("Powerlifting + Cardio", 45, "High", &[]),
];

fn catalog(level: FitnessLevel, category: ExerciseCategory) -> &'static [CatalogEntry] {
    match (level, category) {
        (FitnessLevel::Beginner, ExerciseCategory::Cardio) => BEGINNER_CARDIO,
        (FitnessLevel::Beginner, ExerciseCategory::Strength) => BEGINNER_STRENGTH,
        (FitnessLevel::Beginner, ExerciseCategory::Mixed) => BEGINNER_MIXED,
        (FitnessLevel::Intermediate, ExerciseCategory::Cardio) => INTERMEDIATE_CARDIO,
        (FitnessLevel::Intermediate, ExerciseCategory::Strength) => INTERMEDIATE_STRENGTH,
        (FitnessLevel::Intermediate, ExerciseCategory::Mixed) => INTERMEDIATE_MIXED,
        (FitnessLevel::Advanced, ExerciseCategory::Cardio) => ADVANCED_CARDIO,
        (FitnessLevel::Advanced, ExerciseCategory::Strength) => ADVANCED_STRENGTH,
        (FitnessLevel::Advanced, ExerciseCategory::Mixed) => ADVANCED_MIXED,
    }
}

/// Minutes per session available at an activity level
pub fn available_minutes(level: ActivityLevel) -> u32 {
    match level {
        ActivityLevel::Sedentary => 30,
        ActivityLevel::Light => 45,
        ActivityLevel::Moderate => 60,
        ActivityLevel::Active => 75,
        ActivityLevel::VeryActive => 90,
    }
}

/// Weekly workout frequency for a goal
pub fn weekly_frequency(goal: HealthGoal) -> &'static str {
    match goal {
        HealthGoal::WeightLoss => "5-6 times per week",
        HealthGoal::MuscleGain => "4-5 times per week (with rest days)",
        HealthGoal::Maintenance | HealthGoal::General => "3-4 times per week",
    }
}

/// Build an exercise recommendation for a profile
pub fn recommend_exercise(profile: &UserProfile) -> ExerciseRecommendation {
    let fitness_level = FitnessLevel::from(profile.activity_level);
    let category = ExerciseCategory::from(profile.health_goal);
    let available_time = available_minutes(profile.activity_level);
    let (exercises, total_duration) =
        select_exercises(catalog(fitness_level, category), available_time);

    debug!(
        ?fitness_level,
        ?category,
        selected = exercises.len(),
        total_duration,
        "exercise recommendation"
    );

    ExerciseRecommendation {
        fitness_level,
        exercise_type: category,
        exercises,
        total_duration,
        available_time,
        frequency: weekly_frequency(profile.health_goal).to_string(),
    }
}

/// Greedily take exercises in catalog order while they fit the time budget,
/// up to five. An empty selection falls back to the first exercise.
fn select_exercises(options: &[CatalogEntry], available_time: u32) -> (Vec<Exercise>, u32) {
    let mut selected = Vec::new();
    let mut total = 0;

    for option in options {
        let exercise = option.to_exercise();
        let minutes = exercise.minutes();
        if total + minutes <= available_time {
            total += minutes;
            selected.push(exercise);
        }
        if selected.len() >= MAX_EXERCISES {
            break;
        }
    }

    if selected.is_empty() {
        if let Some(first) = options.first() {
            selected.push(first.to_exercise());
        }
    }

    (selected, total)
}

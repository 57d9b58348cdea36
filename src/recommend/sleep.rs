//! Sleep recommendation
//!
//! Target duration from age, activity and exercise load, a bedtime worked back
//! from the wake time, and sleep hygiene tips.

use crate::aggregation::round_to;
use crate::types::{ActivityLevel, UserProfile};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

const MIN_SLEEP_HOURS: f64 = 6.0;
const MAX_SLEEP_HOURS: f64 = 10.0;
/// Time to fall asleep
const SLEEP_LATENCY_MINUTES: i64 = 15;
const SLEEP_CYCLE_HOURS: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSchedule {
    #[serde(with = "hhmm")]
    pub bedtime: NaiveTime,
    #[serde(with = "hhmm")]
    pub wake_time: NaiveTime,
    pub sleep_duration: f64,
    pub sleep_cycles: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecommendation {
    pub sleep_hours: f64,
    pub schedule: SleepSchedule,
    pub tips: Vec<String>,
}

/// Build a sleep recommendation given the latest day's exercise minutes
pub fn recommend_sleep(
    profile: &UserProfile,
    exercise_minutes: f64,
    wake_time: NaiveTime,
) -> SleepRecommendation {
    let sleep_hours = target_sleep_hours(profile.age, profile.activity_level, exercise_minutes);
    debug!(sleep_hours, %wake_time, "sleep recommendation");

    SleepRecommendation {
        sleep_hours,
        schedule: sleep_schedule(sleep_hours, wake_time),
        tips: sleep_tips(profile.age, profile.activity_level),
    }
}

/// Recommended hours of sleep, clamped to 6-10 and rounded to one decimal
pub fn target_sleep_hours(age: u32, activity: ActivityLevel, exercise_minutes: f64) -> f64 {
    let age = age as f64;
    let mut hours =
        8.0 - age / 100.0 + activity.index() as f64 * 0.2 + exercise_minutes.max(0.0) / 60.0;

    if age < 18.0 {
        hours = (hours + 1.0).clamp(8.0, 10.0);
    } else if age >= 65.0 {
        hours = (hours - 0.5).clamp(7.0, 9.0);
    }

    round_to(hours.clamp(MIN_SLEEP_HOURS, MAX_SLEEP_HOURS), 1)
}

/// Bedtime that allows `sleep_hours` plus time to fall asleep before waking
pub fn sleep_schedule(sleep_hours: f64, wake_time: NaiveTime) -> SleepSchedule {
    let in_bed = Duration::minutes((sleep_hours * 60.0).round() as i64 + SLEEP_LATENCY_MINUTES);
    SleepSchedule {
        bedtime: wake_time - in_bed,
        wake_time,
        sleep_duration: sleep_hours,
        sleep_cycles: round_to(sleep_hours / SLEEP_CYCLE_HOURS, 1),
    }
}

pub fn sleep_tips(age: u32, activity: ActivityLevel) -> Vec<String> {
    let mut tips = vec![
        "Maintain a consistent sleep schedule, even on weekends",
        "Create a relaxing bedtime routine (reading, meditation, warm bath)",
        "Keep your bedroom cool, dark, and quiet",
        "Avoid screens (phone, TV, computer) 1 hour before bedtime",
        "Limit caffeine intake, especially after 2 PM",
        "Avoid large meals and alcohol close to bedtime",
        "Get regular exercise, but not too close to bedtime",
    ];

    if matches!(activity, ActivityLevel::Active | ActivityLevel::VeryActive) {
        tips.push("Consider a post-workout recovery routine to help you wind down");
    }
    if age >= 65 {
        tips.push("Take short naps (20-30 min) if needed, but avoid long naps");
    }

    tips.into_iter().map(String::from).collect()
}

/// Clock times as "HH:MM"
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

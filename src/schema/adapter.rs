//! Adapter for parsing and preparing health records
//!
//! Entries arrive either as a JSON array or as NDJSON (one entry per line).
//! Preparation validates every record and orders the history by date.

use crate::error::InsightError;
use crate::schema::entry::{Validate, ValidationError};
use crate::types::{FoodEntry, HealthEntry, UserProfile};
use tracing::{debug, warn};

/// Adapter for converting raw JSON input into validated records
pub struct EntryAdapter;

impl EntryAdapter {
    /// Parse a JSON string containing an array of health entries
    pub fn parse_array(json: &str) -> Result<Vec<HealthEntry>, InsightError> {
        let entries: Vec<HealthEntry> = serde_json::from_str(json)?;
        Ok(entries)
    }

    /// Parse NDJSON (newline-delimited JSON) containing health entries
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<HealthEntry>, InsightError> {
        let mut entries = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<HealthEntry>(trimmed) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    return Err(InsightError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(entries)
    }

    /// Parse either format, picking JSON array when the input starts with `[`
    pub fn parse_auto(input: &str) -> Result<Vec<HealthEntry>, InsightError> {
        if input.trim_start().starts_with('[') {
            Self::parse_array(input)
        } else {
            Self::parse_ndjson(input)
        }
    }

    /// Parse and validate a user profile
    pub fn parse_profile(json: &str) -> Result<UserProfile, InsightError> {
        let profile: UserProfile = serde_json::from_str(json)?;
        profile
            .validate()
            .map_err(|e| InsightError::InvalidProfile(e.to_string()))?;
        Ok(profile)
    }

    /// Parse a JSON array of food entries
    pub fn parse_food_entries(json: &str) -> Result<Vec<FoodEntry>, InsightError> {
        let foods: Vec<FoodEntry> = serde_json::from_str(json)?;
        for (idx, food) in foods.iter().enumerate() {
            food.validate()
                .map_err(|e| InsightError::InvalidEntry(format!("food entry {idx}: {e}")))?;
        }
        Ok(foods)
    }

    /// Validate all entries, returning one result per invalid entry
    pub fn validate_entries(entries: &[HealthEntry]) -> Vec<ValidationResult> {
        entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                entry.validate().err().map(|error| ValidationResult {
                    index: idx,
                    date: entry.date.to_string(),
                    error,
                })
            })
            .collect()
    }

    /// Validate and sort entries by date.
    ///
    /// Fails on the first invalid entry. Same-day duplicates are kept.
    pub fn prepare(mut entries: Vec<HealthEntry>) -> Result<Vec<HealthEntry>, InsightError> {
        if let Some(invalid) = Self::validate_entries(&entries).into_iter().next() {
            warn!(index = invalid.index, date = %invalid.date, "rejecting invalid entry");
            return Err(InsightError::InvalidEntry(format!(
                "entry {} ({}): {}",
                invalid.index, invalid.date, invalid.error
            )));
        }

        entries.sort_by_key(|e| e.date);

        let duplicates = entries.windows(2).filter(|w| w[0].date == w[1].date).count();
        if duplicates > 0 {
            debug!(duplicates, "history contains multiple entries for the same day");
        }

        Ok(entries)
    }
}

/// Result of entry validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub index: usize,
    pub date: String,
    pub error: ValidationError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_array() -> &'static str {
        r#"[
            {"date": "2024-01-03", "weight": 69.9, "sleep_hours": 7.0},
            {"date": "2024-01-01", "weight": 70.0, "exercise_minutes": 30},
            {"date": "2024-01-02", "weight": 69.8, "calories_consumed": 2100}
        ]"#
    }

    #[test]
    fn test_parse_array() {
        let entries = EntryAdapter::parse_array(sample_array()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].exercise_minutes, Some(30.0));
        assert_eq!(entries[0].notes, "");
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let ndjson = concat!(
            "{\"date\": \"2024-01-01\", \"weight\": 70.0}\n",
            "\n",
            "{\"date\": \"bad\", \"weight\": 70.0}\n",
        );
        let err = EntryAdapter::parse_ndjson(ndjson).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_auto_detects_format() {
        let ndjson = concat!(
            "{\"date\": \"2024-01-01\", \"weight\": 70.0}\n",
            "{\"date\": \"2024-01-02\", \"weight\": 70.2}",
        );
        assert_eq!(EntryAdapter::parse_auto(ndjson).unwrap().len(), 2);
        assert_eq!(EntryAdapter::parse_auto(sample_array()).unwrap().len(), 3);
    }

    #[test]
    fn test_prepare_sorts_by_date() {
        let entries = EntryAdapter::parse_array(sample_array()).unwrap();
        let prepared = EntryAdapter::prepare(entries).unwrap();

        let dates: Vec<NaiveDate> = prepared.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_prepare_rejects_invalid_entry() {
        let json = r#"[
            {"date": "2024-01-01", "weight": 70.0},
            {"date": "2024-01-02", "weight": 500.0}
        ]"#;
        let entries = EntryAdapter::parse_array(json).unwrap();

        let results = EntryAdapter::validate_entries(&entries);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);

        assert!(matches!(
            EntryAdapter::prepare(entries),
            Err(InsightError::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_parse_profile_validates() {
        let valid = r#"{
            "age": 28, "gender": "M", "height_cm": 180, "weight_kg": 78,
            "health_goal": "muscle_gain"
        }"#;
        assert!(EntryAdapter::parse_profile(valid).is_ok());

        let invalid = r#"{"age": 28, "gender": "M", "height_cm": 20, "weight_kg": 78}"#;
        assert!(matches!(
            EntryAdapter::parse_profile(invalid),
            Err(InsightError::InvalidProfile(_))
        ));
    }
}

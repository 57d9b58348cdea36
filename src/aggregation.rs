//! History aggregation and scoring
//!
//! This module turns a dated series of health entries into the scores every
//! analyzer builds on:
//! - Consistency (regularity of logging)
//! - Adherence (fraction of calendar days logged)
//! - Longest streak
//! - Pearson correlation of each behavior against day-over-day weight change

use crate::config::InsightConfig;
use crate::types::{BehaviorField, HealthEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Score reported when there is not enough history to measure regularity
pub const DEFAULT_MIDPOINT_SCORE: f64 = 0.5;

/// Aggregate metrics over a user's entry history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetrics {
    /// Regularity of logging (0-1)
    pub consistency_score: f64,
    /// Logged days / calendar days spanned (0-1)
    pub adherence_rate: f64,
    /// Number of entries
    pub days_active: u32,
    /// Longest run of entries with small gaps
    pub streak_days: u32,
    /// Calendar days in the span without an entry
    pub missed_days: u32,
}

/// Aggregator for computing history metrics and behavior correlations
#[derive(Debug, Clone)]
pub struct Aggregator {
    streak_gap_days: i64,
    min_correlation_samples: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

impl Aggregator {
    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            streak_gap_days: config.streak_gap_days,
            min_correlation_samples: config.min_correlation_samples,
        }
    }

    /// Compute consistency, adherence, streak and gap metrics
    pub fn metrics(&self, entries: &[HealthEntry]) -> HistoryMetrics {
        let dates = sorted_dates(entries);

        if dates.len() < 2 {
            return HistoryMetrics {
                consistency_score: DEFAULT_MIDPOINT_SCORE,
                adherence_rate: DEFAULT_MIDPOINT_SCORE,
                days_active: dates.len() as u32,
                streak_days: dates.len() as u32,
                missed_days: 0,
            };
        }

        let span = span_days(&dates);
        let metrics = HistoryMetrics {
            consistency_score: round_to(consistency_score(&dates), 2),
            adherence_rate: round_to(adherence_rate(&dates), 2),
            days_active: dates.len() as u32,
            streak_days: longest_streak(&dates, self.streak_gap_days),
            missed_days: (span - dates.len() as i64).max(0) as u32,
        };

        debug!(
            entries = dates.len(),
            consistency = metrics.consistency_score,
            adherence = metrics.adherence_rate,
            streak = metrics.streak_days,
            "computed history metrics"
        );

        metrics
    }

    /// Correlate every behavior against weight change.
    ///
    /// Behaviors without enough paired samples are absent from the map.
    pub fn correlations(&self, entries: &[HealthEntry]) -> BTreeMap<BehaviorField, f64> {
        let mut correlations = BTreeMap::new();
        for field in BehaviorField::ALL {
            match self.behavior_correlation(entries, field) {
                Some(r) => {
                    correlations.insert(field, round_to(r, 3));
                }
                None => debug!(behavior = field.as_str(), "correlation omitted"),
            }
        }
        correlations
    }

    /// Pearson correlation between a behavior and the weight change on the same day
    pub fn behavior_correlation(
        &self,
        entries: &[HealthEntry],
        field: BehaviorField,
    ) -> Option<f64> {
        let ordered = sorted_entries(entries);

        let logged = ordered.iter().filter(|e| field.value(e).is_some()).count();
        if logged < self.min_correlation_samples {
            return None;
        }

        let changes = weight_changes(&ordered);
        let (xs, ys): (Vec<f64>, Vec<f64>) = ordered
            .iter()
            .zip(changes)
            .filter_map(|(entry, change)| Some((field.value(entry)?, change?)))
            .unzip();

        if xs.len() < self.min_correlation_samples {
            return None;
        }

        pearson(&xs, &ys)
    }
}

/// Consistency: inverse of the average gap between consecutive dates, scaled
/// so daily logging scores 1.0. Expects sorted dates.
pub fn consistency_score(dates: &[NaiveDate]) -> f64 {
    if dates.len() < 2 {
        return DEFAULT_MIDPOINT_SCORE;
    }

    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();
    let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;

    if avg_gap <= 0.0 {
        return 1.0;
    }
    (2.0 / (1.0 + avg_gap)).min(1.0)
}

/// Adherence: entries per calendar day spanned, capped at 1.0. Expects sorted dates.
pub fn adherence_rate(dates: &[NaiveDate]) -> f64 {
    if dates.len() < 2 {
        return DEFAULT_MIDPOINT_SCORE;
    }
    (dates.len() as f64 / span_days(dates) as f64).min(1.0)
}

/// Longest run of consecutive dates no more than `max_gap_days` apart. Expects sorted dates.
pub fn longest_streak(dates: &[NaiveDate], max_gap_days: i64) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut streak = 1u32;
    let mut max_streak = 1u32;
    for w in dates.windows(2) {
        if (w[1] - w[0]).num_days() <= max_gap_days {
            streak += 1;
            max_streak = max_streak.max(streak);
        } else {
            streak = 1;
        }
    }
    max_streak
}

/// Pearson correlation coefficient; `None` for mismatched, short or constant series
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Day-over-day weight change aligned with the input; the first entry has none
pub fn weight_changes(ordered: &[&HealthEntry]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(ordered.len());
    let mut previous: Option<f64> = None;
    for entry in ordered {
        changes.push(previous.map(|p| entry.weight - p));
        previous = Some(entry.weight);
    }
    changes
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Entries ordered by date (stable for same-day duplicates)
pub fn sorted_entries(entries: &[HealthEntry]) -> Vec<&HealthEntry> {
    let mut ordered: Vec<&HealthEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.date);
    ordered
}

fn sorted_dates(entries: &[HealthEntry]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort();
    dates
}

/// Inclusive number of calendar days between the first and last date
fn span_days(dates: &[NaiveDate]) -> i64 {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => (*last - *first).num_days() + 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn make_entries(days: &[u32]) -> Vec<HealthEntry> {
        days.iter().map(|d| HealthEntry::new(day(*d), 70.0)).collect()
    }

    #[test]
    fn test_daily_entries_are_fully_consistent() {
        let entries = make_entries(&[1, 2, 3, 4, 5]);
        let metrics = Aggregator::default().metrics(&entries);

        assert!((metrics.consistency_score - 1.0).abs() < 1e-9);
        assert!((metrics.adherence_rate - 1.0).abs() < 1e-9);
        assert_eq!(metrics.streak_days, 5);
        assert_eq!(metrics.missed_days, 0);
        assert_eq!(metrics.days_active, 5);
    }

    #[test]
    fn test_sparse_entries() {
        // Gaps of 3 days: consistency 2 / 4, adherence 3 / 7
        let entries = make_entries(&[1, 4, 7]);
        let metrics = Aggregator::default().metrics(&entries);

        assert!((metrics.consistency_score - 0.5).abs() < 1e-9);
        assert!((metrics.adherence_rate - 0.43).abs() < 1e-9);
        assert_eq!(metrics.streak_days, 1);
        assert_eq!(metrics.missed_days, 4);
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let entries = make_entries(&[3, 1, 2]);
        let metrics = Aggregator::default().metrics(&entries);
        assert!((metrics.consistency_score - 1.0).abs() < 1e-9);
        assert_eq!(metrics.streak_days, 3);
    }

    #[test]
    fn test_insufficient_history_defaults() {
        let aggregator = Aggregator::default();

        let empty = aggregator.metrics(&[]);
        assert_eq!(empty.consistency_score, DEFAULT_MIDPOINT_SCORE);
        assert_eq!(empty.adherence_rate, DEFAULT_MIDPOINT_SCORE);
        assert_eq!(empty.streak_days, 0);

        let single = aggregator.metrics(&make_entries(&[10]));
        assert_eq!(single.consistency_score, DEFAULT_MIDPOINT_SCORE);
        assert_eq!(single.adherence_rate, DEFAULT_MIDPOINT_SCORE);
        assert_eq!(single.streak_days, 1);
        assert_eq!(single.days_active, 1);
    }

    #[test]
    fn test_same_day_duplicates() {
        let entries = make_entries(&[5, 5]);
        let metrics = Aggregator::default().metrics(&entries);

        assert_eq!(metrics.consistency_score, 1.0);
        // Two entries over a one-day span is capped
        assert_eq!(metrics.adherence_rate, 1.0);
        assert_eq!(metrics.missed_days, 0);
    }

    #[test]
    fn test_streak_breaks_on_long_gap() {
        let dates: Vec<NaiveDate> = [1, 2, 4, 10, 11, 12, 13].iter().map(|d| day(*d)).collect();
        assert_eq!(longest_streak(&dates, 2), 4);
        assert_eq!(longest_streak(&dates, 6), 7);
        assert_eq!(longest_streak(&[], 2), 0);
    }

    #[test]
    fn test_adherence_always_bounded() {
        let cases: [&[u32]; 4] = [&[1, 2], &[1, 30], &[1, 1, 1, 2], &[3, 9, 12, 28]];
        for days in cases {
            let rate = adherence_rate(&days.iter().map(|d| day(*d)).collect::<Vec<_>>());
            assert!((0.0..=1.0).contains(&rate));
        }
    }

    #[test]
    fn test_exercise_correlates_negatively_with_weight_change() {
        let weights = [70.0, 69.8, 69.9, 69.5, 69.3];
        let entries: Vec<HealthEntry> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let mut entry = HealthEntry::new(day(i as u32 + 1), *w);
                entry.exercise_minutes = Some(10.0 * (i as f64 + 1.0));
                entry
            })
            .collect();

        let correlations = Aggregator::default().correlations(&entries);
        let r = correlations[&BehaviorField::Exercise];
        assert!(r < 0.0);
        assert!(!correlations.contains_key(&BehaviorField::Sleep));
        assert!(!correlations.contains_key(&BehaviorField::Calories));
    }

    #[test]
    fn test_correlation_omitted_with_one_paired_sample() {
        // Sleep logged twice, but the first log has no weight change to pair with
        let mut entries = make_entries(&[1, 2, 3]);
        entries[0].sleep_hours = Some(7.0);
        entries[1].sleep_hours = Some(8.0);
        entries[1].weight = 69.5;

        let correlations = Aggregator::default().correlations(&entries);
        assert!(correlations.is_empty());
    }

    #[test]
    fn test_correlation_omitted_for_constant_series() {
        let mut entries = make_entries(&[1, 2, 3, 4]);
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.sleep_hours = Some(7.0);
            entry.weight = 70.0 - i as f64 * 0.1;
        }
        assert!(Aggregator::default()
            .behavior_correlation(&entries, BehaviorField::Sleep)
            .is_none());
    }

    #[test]
    fn test_pearson_perfect_linear() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-9);

        let inverted = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &inverted).unwrap() + 1.0).abs() < 1e-9);

        assert!(pearson(&xs, &ys[..3]).is_none());
    }

    #[test]
    fn test_weight_changes_alignment() {
        let mut entries = make_entries(&[1, 2, 3]);
        entries[1].weight = 71.0;
        entries[2].weight = 70.5;
        let ordered = sorted_entries(&entries);
        let changes = weight_changes(&ordered);

        assert_eq!(changes[0], None);
        assert!((changes[1].unwrap() - 1.0).abs() < 1e-9);
        assert!((changes[2].unwrap() + 0.5).abs() < 1e-9);
    }
}

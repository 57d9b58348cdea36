//! Report encoding
//!
//! This module wraps analysis results in a versioned report envelope carrying
//! producer metadata, provenance of the analyzed history and quality flags.

use crate::aggregation::adherence_rate;
use crate::error::InsightError;
use crate::types::{BehaviorField, HealthEntry};
use crate::{PRODUCER_NAME, VERSION};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report envelope version
pub const REPORT_VERSION: &str = "1.0.0";

/// Adherence below which logging is flagged as sparse
const SPARSE_ADHERENCE: f64 = 0.5;

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// What history the report was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub entries_analyzed: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub computed_at_utc: String,
}

/// Data quality of the analyzed history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuality {
    /// Logged days / calendar days spanned (0-1)
    pub coverage: f64,
    pub flags: Vec<String>,
}

/// Versioned envelope around a single analysis body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport<T> {
    pub report_version: String,
    /// Which analysis the body holds (e.g. "full", "recovery", "simulation")
    pub kind: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub quality: ReportQuality,
    pub body: T,
}

/// Encoder for producing report envelopes
pub struct InsightEncoder {
    instance_id: String,
}

impl Default for InsightEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap an analysis body computed from `entries`
    pub fn encode<T>(&self, kind: &str, entries: &[HealthEntry], body: T) -> InsightReport<T> {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = ReportProvenance {
            entries_analyzed: entries.len(),
            first_date: entries.iter().map(|e| e.date).min(),
            last_date: entries.iter().map(|e| e.date).max(),
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        InsightReport {
            report_version: REPORT_VERSION.to_string(),
            kind: kind.to_string(),
            producer,
            provenance,
            quality: self.build_quality(entries),
            body,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json<T: Serialize>(
        &self,
        kind: &str,
        entries: &[HealthEntry],
        body: T,
    ) -> Result<String, InsightError> {
        let report = self.encode(kind, entries, body);
        serde_json::to_string_pretty(&report)
            .map_err(|e| InsightError::EncodingError(e.to_string()))
    }

    fn build_quality(&self, entries: &[HealthEntry]) -> ReportQuality {
        let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        dates.sort();
        let coverage = if dates.is_empty() {
            0.0
        } else {
            adherence_rate(&dates)
        };

        let mut flags = Vec::new();
        if entries.len() < 2 {
            flags.push("insufficient_history".to_string());
        } else if coverage < SPARSE_ADHERENCE {
            flags.push("sparse_logging".to_string());
        }
        if !entries.is_empty() {
            for field in BehaviorField::ALL {
                if entries.iter().all(|e| field.value(e).is_none()) {
                    flags.push(format!("no_{}_logged", field.as_str()));
                }
            }
        }

        ReportQuality { coverage, flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(day: u32, weight: f64, sleep: Option<f64>) -> HealthEntry {
        let mut entry = HealthEntry::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap(), weight);
        entry.sleep_hours = sleep;
        entry
    }

    #[test]
    fn test_provenance_covers_history() {
        let encoder = InsightEncoder::with_instance_id("test-instance".to_string());
        let entries = vec![entry(5, 70.0, Some(7.0)), entry(1, 71.0, Some(8.0))];
        let report = encoder.encode("recovery", &entries, 42u32);

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.kind, "recovery");
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.provenance.entries_analyzed, 2);
        assert_eq!(report.provenance.first_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(report.provenance.last_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(report.body, 42);
    }

    #[test]
    fn test_quality_flags() {
        let encoder = InsightEncoder::new();

        let empty = encoder.encode("full", &[], ());
        assert_eq!(empty.quality.coverage, 0.0);
        assert_eq!(empty.quality.flags, vec!["insufficient_history".to_string()]);

        // 2 logged days across a 5-day span
        let logged = [entry(1, 70.0, Some(7.0)), entry(5, 70.0, Some(7.5))];
        let sparse = encoder.encode("full", &logged, ());
        assert!((sparse.quality.coverage - 0.4).abs() < 1e-9);
        assert_eq!(
            sparse.quality.flags,
            vec![
                "sparse_logging".to_string(),
                "no_exercise_logged".to_string(),
                "no_calories_logged".to_string(),
            ]
        );
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = InsightEncoder::new();
        let json = encoder
            .encode_to_json("progress", &[entry(1, 70.0, None)], serde_json::json!({"ok": true}))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"], "progress");
        assert_eq!(value["body"]["ok"], true);
        assert_eq!(value["provenance"]["first_date"], "2024-03-01");
        assert!(value["producer"]["instance_id"].as_str().unwrap().len() >= 32);
    }
}

//! Health Insights - Deterministic scoring and analysis engine for personal health logs
//!
//! Insights turns a user profile and a history of daily health entries into
//! versioned reports through a deterministic pipeline: parsing → validation →
//! aggregation → analysis → report encoding.
//!
//! ## Modules
//!
//! - **Aggregation**: consistency, adherence, streaks and behavior correlations
//! - **Analysis**: recovery, root causes, habit sensitivity, risk, progress and what-if simulation
//! - **Recommendations**: diet, exercise and sleep plans

pub mod aggregation;
pub mod analysis;
pub mod config;
pub mod encoder;
pub mod error;
pub mod nutrition;
pub mod pipeline;
pub mod recommend;
pub mod schema;
pub mod types;

pub use aggregation::{Aggregator, HistoryMetrics};
pub use config::InsightConfig;
pub use encoder::{InsightEncoder, InsightReport, REPORT_VERSION};
pub use error::InsightError;
pub use pipeline::{
    analyze_json, analyze_kind_json, recommend_json, simulate_json, AnalysisKind, FullAnalysis,
    InsightProcessor, RecommendationKind,
};

// Schema exports
pub use schema::{EntryAdapter, SCHEMA_VERSION};

pub use types::{FoodEntry, HealthEntry, UserProfile};

/// Crate version embedded in every report
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "health-insights";

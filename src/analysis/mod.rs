//! History analyses
//!
//! Each analyzer consumes a user's entry history (and profile where needed)
//! and produces a serializable report:
//! - Recovery speed and behavior stability
//! - Behavior/weight-change correlations and root causes
//! - Habit fragility and impact
//! - Alerts and disease risk
//! - Goal progress
//! - What-if simulation

pub mod correlation;
pub mod habits;
pub mod progress;
pub mod recovery;
pub mod risk;
pub mod simulator;

pub use correlation::{
    predict_impact, BehaviorInsight, CorrelationAnalysis, CorrelationAnalyzer, Impact,
};
pub use habits::{HabitAnalysis, HabitAnalyzer, HabitKind, HabitScore};
pub use progress::{assess_progress, ProgressAssessment, ProgressStatus};
pub use recovery::{RecoveryAnalysis, RecoveryAnalyzer, StabilityRisk};
pub use risk::{Disease, DiseaseRisk, RiskAlert, RiskAssessment, RiskFactors, RiskLevel};
pub use simulator::{Baseline, Scenario, SimulationResult};

//! Burnout risk scoring, trend analysis, and intervention planning.
//!
//! Data flows collector-style: a check-in is scored by the pure scoring
//! engine, persisted through the gateway (durable store with a local-cache
//! fallback), summarized by the trend analyzer, mapped to a plan by the
//! intervention rule table, and finally announced on the alert bus when it
//! crosses a risk threshold.

pub mod alerts;
pub mod cache;
pub mod domain;
pub mod gateway;
pub(crate) mod intervention;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod trend;

#[cfg(test)]
mod tests;

pub use alerts::{AlertBus, AlertSubscription};
pub use cache::{CacheError, LocalCache};
pub use domain::{
    ActionOutcome, ActionPriority, Assessment, AssessmentAnswers, ContextFactors, EmotionalDemand,
    InterventionAction, InterventionPlan, OutcomeEvent, Resource, RiskAlert, RiskAssessment,
    RiskConfig, RiskFactors, RiskLevel, RiskThresholds, SyncStatus, TrendDirection, TrendPoint,
    UserId, WorkloadIntensity,
};
pub use gateway::{DataSource, GatewayError, HistorySnapshot, PersistenceGateway};
pub use intervention::InterventionPlanner;
pub use router::care_router;
pub use scoring::{ScoreOutcome, ValidationError};
pub use service::{RiskTrend, ServiceError, SubmissionReceipt, WellnessService};
pub use store::{
    AssessmentStore, MemoryOutcomeLog, MemoryStore, OutcomeLog, OutcomeLogError, StoreError,
};

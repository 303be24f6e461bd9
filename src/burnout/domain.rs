use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for authenticated interpreters. Absence means "guest",
/// in which case every remote operation becomes a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The five ordinal self-report answers, each in [1,5]. Higher is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAnswers {
    pub energy_tank: u8,
    pub recovery_speed: u8,
    pub emotional_leakage: u8,
    pub performance_signal: u8,
    pub tomorrow_readiness: u8,
}

impl AssessmentAnswers {
    /// Dimension labels paired with their values, in canonical order.
    pub fn dimensions(&self) -> [(&'static str, u8); 5] {
        [
            ("energy_tank", self.energy_tank),
            ("recovery_speed", self.recovery_speed),
            ("emotional_leakage", self.emotional_leakage),
            ("performance_signal", self.performance_signal),
            ("tomorrow_readiness", self.tomorrow_readiness),
        ]
    }
}

/// Self-reported workload for the day of the check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadIntensity {
    Light,
    Moderate,
    Heavy,
}

/// Self-reported emotional demand of the day's assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalDemand {
    Low,
    Medium,
    High,
}

/// Optional context captured alongside the five answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFactors {
    pub workload: WorkloadIntensity,
    pub emotional_demand: EmotionalDemand,
    pub had_breaks: bool,
    pub team_support: bool,
    pub difficult_session: bool,
}

/// Ordinal risk band derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    /// Step function over the configured score bands. Boundary values belong
    /// to the lower band.
    pub fn from_score(score: f32, thresholds: &RiskThresholds) -> Self {
        if score <= thresholds.low_max {
            RiskLevel::Low
        } else if score <= thresholds.moderate_max {
            RiskLevel::Moderate
        } else if score <= thresholds.high_max {
            RiskLevel::High
        } else {
            RiskLevel::Severe
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Severe => "severe",
        }
    }

    /// High and severe check-ins trigger live alerts and urgency-flagged
    /// recommendations.
    pub const fn is_elevated(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Severe)
    }
}

/// Upper bound of each risk band. Scores above `high_max` are severe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub low_max: f32,
    pub moderate_max: f32,
    pub high_max: f32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_max: 2.0,
            moderate_max: 3.0,
            high_max: 4.0,
        }
    }
}

/// Tunable parameters for scoring and trend analysis. The defaults mirror the
/// clinically reviewed constants; deployments may override them through the
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub thresholds: RiskThresholds,
    /// Tolerance around the window comparison so day-to-day noise does not
    /// flip the trend classification.
    pub trend_epsilon: f32,
    /// Projections further out than this many weeks are suppressed.
    pub projection_horizon_weeks: u8,
    /// Default history window for trend queries, in days.
    pub lookback_days: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            trend_epsilon: 0.2,
            projection_horizon_weeks: 12,
            lookback_days: 30,
        }
    }
}

/// One scored check-in. Immutable once stored, except that a second
/// submission on the same calendar day overwrites the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub answers: AssessmentAnswers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextFactors>,
    pub total_score: f32,
    pub risk_level: RiskLevel,
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

/// Direction of the recent risk trajectory.
///
/// `Declining` survives from an earlier client taxonomy where it was a synonym
/// for `Worsening`; the analyzer never emits it but the wire format still
/// accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Declining,
    Stable,
}

impl TrendDirection {
    pub const fn label(self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Worsening => "worsening",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Structured snapshot of the signals feeding the intervention rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Mean energy-tank answer over the most recent entries (up to seven).
    pub energy_trend: f32,
    /// Mean total score over the same window.
    pub stress_level: f32,
    /// Distinct days with a check-in during the last seven calendar days.
    pub engagement_days: u32,
    pub chronic_stress_detected: bool,
}

/// Derived view summarizing the most recent state. Recomputed on every read,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f32,
    pub risk_level: RiskLevel,
    pub trend: TrendDirection,
    pub factors: RiskFactors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks_until_burnout: Option<u8>,
    pub recommended_actions: Vec<String>,
}

/// Single point in a risk history series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub risk_score: f32,
    pub risk_level: RiskLevel,
}

/// Priority bands for intervention actions. Ordering matters: critical items
/// must surface first in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl ActionPriority {
    pub const fn label(self) -> &'static str {
        match self {
            ActionPriority::Critical => "critical",
            ActionPriority::High => "high",
            ActionPriority::Medium => "medium",
            ActionPriority::Low => "low",
        }
    }
}

/// A single suggested action inside an intervention plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionAction {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: ActionPriority,
    pub estimated_time: String,
    pub completed: bool,
}

/// External resource surfaced alongside a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// Ephemeral, rule-derived response to a risk assessment. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionPlan {
    pub actions: Vec<InterventionAction>,
    pub elya_prompts: Vec<String>,
    pub resources: Vec<Resource>,
}

impl InterventionPlan {
    pub fn action_ids(&self) -> Vec<String> {
        self.actions.iter().map(|action| action.id.clone()).collect()
    }
}

/// Outcome reported for a suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Completed,
    Skipped,
}

impl ActionOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            ActionOutcome::Completed => "completed",
            ActionOutcome::Skipped => "skipped",
        }
    }
}

/// Event appended to the outcome log when an action is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub action_id: String,
    pub outcome: ActionOutcome,
    pub recorded_at: DateTime<Utc>,
}

/// Payload delivered to alert subscribers on a qualifying write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub risk_level: RiskLevel,
    pub message: String,
}

/// Where a submitted assessment currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Durable store and local cache both hold the row.
    Synced,
    /// Remote write failed; the row is cached locally and will sync later.
    Pending,
    /// Guest session, so the local cache is the only destination.
    LocalOnly,
}

impl SyncStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Pending => "pending",
            SyncStatus::LocalOnly => "local_only",
        }
    }
}

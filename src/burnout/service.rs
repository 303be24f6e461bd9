use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::alerts::{AlertBus, AlertSubscription};
use super::cache::LocalCache;
use super::domain::{
    ActionOutcome, Assessment, AssessmentAnswers, ContextFactors, InterventionPlan, OutcomeEvent,
    RiskAlert, RiskAssessment, RiskConfig, SyncStatus, TrendPoint, UserId,
};
use super::gateway::{GatewayError, PersistenceGateway};
use super::intervention::InterventionPlanner;
use super::scoring::{self, ValidationError};
use super::store::{AssessmentStore, OutcomeLog, OutcomeLogError};
use super::trend;

/// Error raised by the wellness service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] GatewayError),
    #[error(transparent)]
    Outcomes(#[from] OutcomeLogError),
}

/// What the caller gets back from a submission: the scored assessment plus
/// the sync state the UI renders as its saving indicator.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub assessment: Assessment,
    pub recommendations: Vec<String>,
    pub sync: SyncStatus,
}

/// Risk history response: chart points, the derived summary, and whether the
/// data came from the degraded local path.
#[derive(Debug, Clone, Serialize)]
pub struct RiskTrend {
    pub points: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RiskAssessment>,
    pub degraded: bool,
}

/// Facade composing the scoring engine, persistence gateway, trend analyzer,
/// intervention planner, outcome log, and alert bus.
pub struct WellnessService<S, L> {
    gateway: PersistenceGateway<S>,
    outcomes: Arc<L>,
    alerts: AlertBus,
    planner: InterventionPlanner,
    config: RiskConfig,
}

impl<S, L> WellnessService<S, L>
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    pub fn new(store: Arc<S>, outcomes: Arc<L>, cache: LocalCache, config: RiskConfig) -> Self {
        Self {
            gateway: PersistenceGateway::new(store, cache),
            outcomes,
            alerts: AlertBus::new(),
            planner: InterventionPlanner::new(config.clone()),
            config,
        }
    }

    /// Score and persist today's check-in. A second submission on the same
    /// day overwrites the first. High or severe results notify any live
    /// alert subscribers for the user.
    pub async fn submit_assessment(
        &self,
        user: Option<&UserId>,
        answers: AssessmentAnswers,
        context: Option<ContextFactors>,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let today = Local::now().date_naive();
        let outcome = scoring::evaluate(&answers, context.as_ref(), &self.config.thresholds)?;
        let assessment = Assessment {
            answers,
            context,
            total_score: outcome.total_score,
            risk_level: outcome.risk_level,
            date: today,
            recorded_at: Utc::now(),
        };

        let sync = self.gateway.save(user, &assessment, today).await?;

        if assessment.risk_level.is_elevated() {
            if let Some(user) = user {
                self.alerts.publish(
                    user,
                    &RiskAlert {
                        risk_level: assessment.risk_level,
                        message: format!(
                            "Today's check-in shows {} burnout risk. Review your recovery plan.",
                            assessment.risk_level.label()
                        ),
                    },
                );
            }
        }

        Ok(SubmissionReceipt {
            assessment,
            recommendations: outcome.recommendations,
            sync,
        })
    }

    /// Recompute the current risk summary from the stored history. `None`
    /// means no assessments yet, which is a legitimate state, not an error.
    pub async fn latest_risk_assessment(
        &self,
        user: Option<&UserId>,
    ) -> Result<Option<RiskAssessment>, ServiceError> {
        let trend = self.risk_trend(user, self.config.lookback_days).await?;
        Ok(trend.summary)
    }

    /// Risk history over the last `days` calendar days, plus the derived
    /// summary. Served from the durable store, degrading to the local cache.
    pub async fn risk_trend(
        &self,
        user: Option<&UserId>,
        days: u32,
    ) -> Result<RiskTrend, ServiceError> {
        let today = Local::now().date_naive();
        let since = today - Duration::days(i64::from(days.max(1)) - 1);
        self.risk_trend_at(user, since, today).await
    }

    pub(crate) async fn risk_trend_at(
        &self,
        user: Option<&UserId>,
        since: NaiveDate,
        today: NaiveDate,
    ) -> Result<RiskTrend, ServiceError> {
        let snapshot = self.gateway.history(user, since).await?;

        let points = trend::trend_points(&snapshot.assessments);
        let summary = trend::summarize(&snapshot.assessments, today, &self.config).map(
            |mut summary| {
                summary.recommended_actions = self.planner.plan(&summary).action_ids();
                summary
            },
        );

        Ok(RiskTrend {
            points,
            summary,
            degraded: snapshot.degraded,
        })
    }

    /// Pure projection from a risk assessment to a prioritized plan.
    pub fn intervention_plan(&self, risk: &RiskAssessment) -> InterventionPlan {
        self.planner.plan(risk)
    }

    /// Register a live alert listener for `user`. The handle cancels
    /// synchronously and idempotently; dropping it also cancels.
    pub fn subscribe_to_alerts(
        &self,
        user: &UserId,
        callback: impl Fn(&RiskAlert) + Send + Sync + 'static,
    ) -> AlertSubscription {
        self.alerts.subscribe(user, callback)
    }

    /// Append a completed/skipped event to the outcome log. Never mutates
    /// the rule table.
    pub fn record_intervention_outcome(
        &self,
        user: Option<&UserId>,
        action_id: &str,
        outcome: ActionOutcome,
    ) -> Result<(), ServiceError> {
        self.outcomes.record(
            user,
            OutcomeEvent {
                action_id: action_id.to_string(),
                outcome,
                recorded_at: Utc::now(),
            },
        )?;
        info!(action_id, outcome = outcome.label(), "intervention outcome recorded");
        Ok(())
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ActionOutcome, AssessmentAnswers, ContextFactors, RiskAssessment, UserId,
};
use super::service::{ServiceError, WellnessService};
use super::store::{AssessmentStore, OutcomeLog};

/// Router builder exposing the burnout core to the presentational UI.
pub fn care_router<S, L>(service: Arc<WellnessService<S, L>>) -> Router
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    Router::new()
        .route("/api/v1/checkins", post(submit_handler::<S, L>))
        .route("/api/v1/users/:user_id/risk", get(risk_handler::<S, L>))
        .route("/api/v1/users/:user_id/trend", get(trend_handler::<S, L>))
        .route("/api/v1/plans", post(plan_handler::<S, L>))
        .route("/api/v1/outcomes", post(outcome_handler::<S, L>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckinRequest {
    /// Absent for guest sessions; the check-in then stays device-local.
    pub user_id: Option<String>,
    pub answers: AssessmentAnswers,
    #[serde(default)]
    pub context: Option<ContextFactors>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrendQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutcomeRequest {
    pub user_id: Option<String>,
    pub action_id: String,
    pub outcome: ActionOutcome,
}

pub(crate) async fn submit_handler<S, L>(
    State(service): State<Arc<WellnessService<S, L>>>,
    axum::Json(request): axum::Json<CheckinRequest>,
) -> Response
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    let user = request.user_id.map(UserId);
    match service
        .submit_assessment(user.as_ref(), request.answers, request.context)
        .await
    {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn risk_handler<S, L>(
    State(service): State<Arc<WellnessService<S, L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    let user = UserId(user_id);
    match service.latest_risk_assessment(Some(&user)).await {
        Ok(Some(risk)) => (StatusCode::OK, axum::Json(risk)).into_response(),
        Ok(None) => {
            // First-time users have no history yet; that is a state, not an
            // error.
            let payload = json!({
                "user_id": user.0,
                "status": "no_data",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn trend_handler<S, L>(
    State(service): State<Arc<WellnessService<S, L>>>,
    Path(user_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Response
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    let user = UserId(user_id);
    let days = query.days.unwrap_or(30);
    match service.risk_trend(Some(&user), days).await {
        Ok(trend) => (StatusCode::OK, axum::Json(trend)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn plan_handler<S, L>(
    State(service): State<Arc<WellnessService<S, L>>>,
    axum::Json(risk): axum::Json<RiskAssessment>,
) -> Response
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    let plan = service.intervention_plan(&risk);
    (StatusCode::OK, axum::Json(plan)).into_response()
}

pub(crate) async fn outcome_handler<S, L>(
    State(service): State<Arc<WellnessService<S, L>>>,
    axum::Json(request): axum::Json<OutcomeRequest>,
) -> Response
where
    S: AssessmentStore + 'static,
    L: OutcomeLog + 'static,
{
    let user = request.user_id.map(UserId);
    match service.record_intervention_outcome(user.as_ref(), &request.action_id, request.outcome) {
        Ok(()) => {
            let payload = json!({ "status": "recorded" });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Storage(_) | ServiceError::Outcomes(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

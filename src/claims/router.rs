use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::SegmentedClaim;
use super::engine::ClaimEvaluation;
use super::service::{
    ClaimServiceError, ClaimValidationService, DecisionNotifier, EmbeddingProvider, PolicyStore,
};

/// Router builder exposing the claim validation endpoint.
pub fn claims_router<P, E, N>(service: Arc<ClaimValidationService<P, E, N>>) -> Router
where
    P: PolicyStore + 'static,
    E: EmbeddingProvider + 'static,
    N: DecisionNotifier + 'static,
{
    Router::new()
        .route("/api/v1/claims/validate", post(validate_handler::<P, E, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct ValidateClaimRequest {
    pub policy_number: String,
    #[serde(flatten)]
    pub claim: SegmentedClaim,
}

#[derive(Debug, Serialize)]
pub struct ValidateClaimResponse {
    pub decision: &'static str,
    pub evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub evaluation: ClaimEvaluation,
}

pub(crate) async fn validate_handler<P, E, N>(
    State(service): State<Arc<ClaimValidationService<P, E, N>>>,
    axum::Json(request): axum::Json<ValidateClaimRequest>,
) -> Response
where
    P: PolicyStore + 'static,
    E: EmbeddingProvider + 'static,
    N: DecisionNotifier + 'static,
{
    match service.validate(&request.claim, &request.policy_number) {
        Ok(evaluation) => {
            let response = ValidateClaimResponse {
                decision: evaluation.result.decision.label(),
                evaluated_at: Utc::now(),
                evaluation,
            };
            (StatusCode::OK, axum::Json(response)).into_response()
        }
        Err(ClaimServiceError::PolicyNotFound(policy_number)) => {
            let payload = json!({
                "error": format!("policy {policy_number} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

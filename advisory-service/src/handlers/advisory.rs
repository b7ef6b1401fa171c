use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::models::{AdvisoryRequest, AdvisoryResponse};
use crate::startup::AppState;

/// `POST /health-advisory`
///
/// Advisory-generation failures still answer 200; the report text then
/// carries the error. Only invalid input and missing configuration produce
/// an error status.
#[tracing::instrument(skip_all)]
pub async fn health_advisory(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdvisoryRequest>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    tracing::info!(
        people_type = %request.people_type,
        disease = %request.disease,
        aqi = request.aqi,
        "Advisory requested"
    );

    let message = state.advisory.advisory_text(&request).await?;

    Ok(Json(AdvisoryResponse::ok(message)))
}

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, AuthFailure};
use crate::database::service;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    /// Opaque answers, positionally aligned to the survey questions.
    /// Schema validation against the questions is out of scope.
    #[serde(default)]
    pub answers: Value,
}

/// POST /surveys/:id/respond - record one response per authenticated user
///
/// Sequential checks; the first failing check short-circuits:
/// classified token failure, missing identity, malformed id, absent survey,
/// creator self-submission, then the atomic insert (duplicates surface as
/// Conflict from the store's unique constraint).
pub async fn survey_respond(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<RespondRequest>,
) -> ApiResult<Value> {
    let (identity, failure) = auth::verify_bearer(&headers, &state.config.security.jwt_secret);

    if let Some(failure) = failure {
        return Err(auth_failure_to_error(failure));
    }

    let user_id = identity.ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let survey_id =
        Uuid::parse_str(&survey_id).map_err(|_| ApiError::invalid_survey_id("Invalid survey ID"))?;

    let survey = service::find_survey_by_id(&state.db, survey_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey not found"))?;

    // Creators may not answer their own survey; identities compare as strings
    if user_id == survey.created_by.to_string() {
        return Err(ApiError::forbidden(
            "You cannot submit a response to your own survey.",
        ));
    }

    let response =
        service::submit_response(&state.db, survey_id, &user_id, payload.answers).await?;

    info!(survey_id = %survey_id, response_id = %response.id, "Response recorded");

    Ok(ApiResponse::created(json!({
        "message": "Response recorded successfully"
    })))
}

fn auth_failure_to_error(failure: AuthFailure) -> ApiError {
    match failure {
        AuthFailure::Expired => ApiError::token_expired("Session expired"),
        AuthFailure::Invalid => ApiError::unauthorized("Invalid token"),
    }
}

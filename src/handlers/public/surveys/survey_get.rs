use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth;
use crate::database::models::Survey;
use crate::database::service;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /surveys/:id - public projection of a single survey
///
/// Auth is optional here. Verification failures are deliberately ignored so
/// anonymous viewers, and viewers holding a stale token, still see the page;
/// they just get `has_responded: false`.
pub async fn survey_get(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let (identity, _failure) = auth::verify_bearer(&headers, &state.config.security.jwt_secret);

    let survey_id =
        Uuid::parse_str(&survey_id).map_err(|_| ApiError::invalid_survey_id("Invalid survey ID"))?;

    let survey = service::find_survey_by_id(&state.db, survey_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey not found"))?;

    let has_responded = match &identity {
        Some(user_id) => service::has_responded(&state.db, survey_id, user_id).await?,
        None => false,
    };

    Ok(ApiResponse::success(public_view(&survey, has_responded)))
}

/// Read-only projection. Ids are stringified; response content is never
/// part of the public view.
fn public_view(survey: &Survey, has_responded: bool) -> Value {
    json!({
        "id": survey.id.to_string(),
        "title": survey.title,
        "description": survey.description,
        "questions": survey.questions,
        "created_by": survey.created_by.to_string(),
        "has_responded": has_responded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_survey() -> Survey {
        Survey {
            id: Uuid::new_v4(),
            title: "Team lunch".to_string(),
            description: Some("Pick a place".to_string()),
            questions: json!([{ "id": "q1", "text": "Where?", "type": "text" }]),
            created_by: Uuid::new_v4(),
            response_count: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn view_stringifies_ids_and_carries_flag() {
        let survey = sample_survey();
        let view = public_view(&survey, true);

        assert_eq!(view["id"], survey.id.to_string());
        assert_eq!(view["created_by"], survey.created_by.to_string());
        assert_eq!(view["has_responded"], true);
        assert_eq!(view["title"], "Team lunch");
    }

    #[test]
    fn view_never_exposes_response_data() {
        let survey = sample_survey();
        let view = public_view(&survey, false);

        assert!(view.get("answers").is_none());
        assert!(view.get("response_count").is_none());
        assert_eq!(view["has_responded"], false);
    }
}

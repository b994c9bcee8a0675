use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub survey_id: Uuid,
    /// Identity from the verified credential, kept as an opaque string
    pub user_id: String,
    /// Answers positionally aligned to the survey questions, not validated here
    pub answers: Value,
    pub submitted_at: DateTime<Utc>,
}

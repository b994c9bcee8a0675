use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::response::SurveyResponse;
use crate::database::models::survey::Survey;

/// Fetch a survey by id
pub async fn find_survey_by_id(pool: &PgPool, survey_id: Uuid) -> Result<Option<Survey>, DatabaseError> {
    let survey = sqlx::query_as::<_, Survey>(
        "SELECT id, title, description, questions, created_by, response_count, created_at, updated_at
         FROM surveys
         WHERE id = $1",
    )
    .bind(survey_id)
    .fetch_optional(pool)
    .await?;

    Ok(survey)
}

/// Check whether an identity has already responded to a survey
pub async fn has_responded(pool: &PgPool, survey_id: Uuid, user_id: &str) -> Result<bool, DatabaseError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM responses WHERE survey_id = $1 AND user_id = $2)",
    )
    .bind(survey_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Record a response and bump the survey counter in one transaction.
///
/// There is no pre-flight existence check: the UNIQUE (survey_id, user_id)
/// constraint decides, so two concurrent submissions from the same identity
/// cannot both land. A constraint violation surfaces as `DuplicateKey` and
/// the counter increment never happens for the loser.
pub async fn submit_response(
    pool: &PgPool,
    survey_id: Uuid,
    user_id: &str,
    answers: Value,
) -> Result<SurveyResponse, DatabaseError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query_as::<_, SurveyResponse>(
        "INSERT INTO responses (id, survey_id, user_id, answers, submitted_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, survey_id, user_id, answers, submitted_at",
    )
    .bind(Uuid::new_v4())
    .bind(survey_id)
    .bind(user_id)
    .bind(answers)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatabaseError::DuplicateKey("responses.survey_id+user_id")
        }
        other => DatabaseError::Sqlx(other),
    })?;

    sqlx::query(
        "UPDATE surveys
         SET response_count = response_count + 1, updated_at = now()
         WHERE id = $1",
    )
    .bind(survey_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(inserted)
}

//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::feedback::store::{FeedbackError, FeedbackRow, NewFeedback};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 500;

/// `rating` is kept loose so that fractional, oversized or missing values
/// get the same 400 as an out-of-range integer instead of a 422 from `Json`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub rating: Value,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::RatingOutOfRange(_) => AppError::Validation(err.to_string()),
            FeedbackError::Database(e) => {
                let is_check_violation = e
                    .as_database_error()
                    .is_some_and(|d| d.is_check_violation());
                if is_check_violation {
                    AppError::Validation("Rating must be between 1 and 5".to_string())
                } else {
                    AppError::Database(e)
                }
            }
        }
    }
}

/// POST /api/v1/feedback
///
/// Open to anonymous callers.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackRow>), AppError> {
    let rating = req.rating.as_i64().ok_or_else(|| {
        AppError::Validation(format!(
            "Rating must be a whole number between 1 and 5, got {}",
            req.rating
        ))
    })?;
    let feedback = NewFeedback::new(rating, req.comment)?;
    let row = state.feedback.insert(feedback).await?;
    tracing::info!(rating = row.rating, "Feedback recorded");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/feedback
///
/// Requires `Authorization: Bearer <FEEDBACK_READ_TOKEN>`.
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<FeedbackRow>>, AppError> {
    let expected = state
        .config
        .feedback_read_token
        .as_deref()
        .ok_or(AppError::Unauthorized)?;

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if provided != Some(expected) {
        return Err(AppError::Unauthorized);
    }

    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    Ok(Json(state.feedback.list(limit).await?))
}

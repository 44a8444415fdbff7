//! Feedback persistence behind a trait so handlers never touch SQL directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A validated star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i64) -> Result<Self, FeedbackError> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            // In range, so it fits the INTEGER column.
            Ok(Self(value as i32))
        } else {
            Err(FeedbackError::RatingOutOfRange(value))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub rating: Rating,
    pub comment: Option<String>,
}

impl NewFeedback {
    /// Validates the rating and normalises a blank comment to `None`.
    pub fn new(rating: i64, comment: Option<String>) -> Result<Self, FeedbackError> {
        Ok(Self {
            rating: Rating::new(rating)?,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackRow {
    pub id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Carried in `AppState` as `Arc<dyn FeedbackStore>`. No update or delete.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRow, FeedbackError>;
    async fn list(&self, limit: i64) -> Result<Vec<FeedbackRow>, FeedbackError>;
}

/// PostgreSQL store. The table also carries `CHECK (rating BETWEEN 1 AND 5)`.
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRow, FeedbackError> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            r#"
            INSERT INTO feedback (id, rating, comment)
            VALUES ($1, $2, $3)
            RETURNING id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(feedback.rating.value())
        .bind(feedback.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, limit: i64) -> Result<Vec<FeedbackRow>, FeedbackError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            "SELECT id, rating, comment, created_at FROM feedback ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

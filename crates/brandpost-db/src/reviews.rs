//! Database operations for the `reviews` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub post_id: i64,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview<'a> {
    pub post_id: i64,
    pub rating: i64,
    pub comment: Option<&'a str>,
}

/// Insert a review for an existing post.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure; a missing parent post
/// surfaces as a foreign-key violation (see [`DbError::is_foreign_key_violation`]).
pub async fn create_review(
    pool: &SqlitePool,
    review: &NewReview<'_>,
) -> Result<ReviewRow, DbError> {
    Ok(sqlx::query_as::<_, ReviewRow>(
        "INSERT INTO reviews (post_id, rating, comment, created_at) \
         VALUES (?, ?, ?, ?) \
         RETURNING id, post_id, rating, comment, created_at",
    )
    .bind(review.post_id)
    .bind(review.rating)
    .bind(review.comment.unwrap_or_default())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?)
}

/// Reviews attached to a post, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_reviews_for_post(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    Ok(sqlx::query_as::<_, ReviewRow>(
        "SELECT id, post_id, rating, comment, created_at \
         FROM reviews WHERE post_id = ? \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?)
}

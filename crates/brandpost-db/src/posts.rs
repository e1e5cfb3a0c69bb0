//! Database operations for the `posts` table.

use brandpost_core::{Category, Platform, PostStatus};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub platform: Option<String>,
    /// Path relative to the media root, e.g. `images/<uuid>-banner.png`.
    pub image: Option<String>,
    pub status: String,
    pub date: DateTime<Utc>,
}

/// Insert payload for [`create_post`].
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: Option<Category>,
    pub platform: Option<Platform>,
    pub image: Option<&'a str>,
    pub status: PostStatus,
}

const POST_COLUMNS: &str = "id, title, content, category, platform, image, status, date";

/// Insert a post stamped with the current time and return the stored row.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn create_post(pool: &SqlitePool, post: &NewPost<'_>) -> Result<PostRow, DbError> {
    let sql = format!(
        "INSERT INTO posts (title, content, category, platform, image, status, date) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING {POST_COLUMNS}"
    );
    Ok(sqlx::query_as::<_, PostRow>(&sql)
        .bind(post.title)
        .bind(post.content)
        .bind(post.category.map(Category::as_str))
        .bind(post.platform.map(Platform::as_str))
        .bind(post.image)
        .bind(post.status.as_str())
        .bind(Utc::now())
        .fetch_one(pool)
        .await?)
}

/// All posts, newest first. Ties on `date` fall back to insertion order.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<PostRow>, DbError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY date DESC, id DESC");
    Ok(sqlx::query_as::<_, PostRow>(&sql).fetch_all(pool).await?)
}

/// Get a post by id, if it exists.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<PostRow>, DbError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?");
    Ok(sqlx::query_as::<_, PostRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Delete a post and return the removed row, or `None` if no post had that
/// id. Its reviews are removed by the `ON DELETE CASCADE` key.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<Option<PostRow>, DbError> {
    let sql = format!("DELETE FROM posts WHERE id = ? RETURNING {POST_COLUMNS}");
    Ok(sqlx::query_as::<_, PostRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample<'a>(title: &'a str) -> NewPost<'a> {
        NewPost {
            title,
            content: "Launching our spring line",
            category: Some(Category::Marketing),
            platform: Some(Platform::Instagram),
            image: None,
            status: PostStatus::default(),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_post_returns_stored_row(pool: SqlitePool) {
        let row = create_post(&pool, &sample("Spring launch"))
            .await
            .expect("create post");

        assert!(row.id > 0);
        assert_eq!(row.title, "Spring launch");
        assert_eq!(row.category.as_deref(), Some("Marketing"));
        assert_eq!(row.platform.as_deref(), Some("Instagram"));
        assert_eq!(row.status, "Needs Review");
        assert!(row.image.is_none());

        let fetched = get_post(&pool, row.id)
            .await
            .expect("get post")
            .expect("post exists");
        assert_eq!(fetched.title, row.title);
        assert_eq!(fetched.date, row.date);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_post_accepts_missing_classification(pool: SqlitePool) {
        let post = NewPost {
            category: None,
            platform: None,
            image: Some("images/abc-banner.png"),
            status: PostStatus::ReadyToPublish,
            ..sample("Unclassified")
        };
        let row = create_post(&pool, &post).await.expect("create post");

        assert!(row.category.is_none());
        assert!(row.platform.is_none());
        assert_eq!(row.image.as_deref(), Some("images/abc-banner.png"));
        assert_eq!(row.status, "Ready to Publish");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_posts_returns_newest_first(pool: SqlitePool) {
        for title in ["first", "second", "third"] {
            create_post(&pool, &sample(title)).await.expect("create");
        }

        let posts = list_posts(&pool).await.expect("list");
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
        assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_posts_orders_by_date_not_id(pool: SqlitePool) {
        let dates = [
            ("march", Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
            ("january", Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()),
            ("february", Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()),
        ];
        for (title, date) in dates {
            sqlx::query("INSERT INTO posts (title, content, status, date) VALUES (?, 'x', 'Needs Review', ?)")
                .bind(title)
                .bind(date)
                .execute(&pool)
                .await
                .expect("insert");
        }

        let posts = list_posts(&pool).await.expect("list");
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["march", "february", "january"]);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_post_returns_none_for_unknown_id(pool: SqlitePool) {
        assert!(get_post(&pool, 9_999).await.expect("query").is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn delete_post_returns_the_removed_row_once(pool: SqlitePool) {
        let post = NewPost {
            image: Some("images/abc-doomed.png"),
            ..sample("doomed")
        };
        let row = create_post(&pool, &post).await.expect("create");

        let removed = delete_post(&pool, row.id)
            .await
            .expect("delete")
            .expect("row was removed");
        assert_eq!(removed.id, row.id);
        assert_eq!(removed.image.as_deref(), Some("images/abc-doomed.png"));

        assert!(delete_post(&pool, row.id).await.expect("second delete").is_none());
        assert!(get_post(&pool, row.id).await.expect("get").is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn title_longer_than_200_chars_is_rejected(pool: SqlitePool) {
        let long_title = "x".repeat(201);
        let result = create_post(&pool, &sample(&long_title)).await;
        assert!(result.is_err(), "expected CHECK constraint failure");
        assert!(list_posts(&pool).await.expect("list").is_empty());
    }
}

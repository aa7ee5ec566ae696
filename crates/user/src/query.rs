use foodgram_shared::{Page, Pagination};
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

/// Public user representation, `is_subscribed` is relative to the viewer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

const SELECT_USER_VIEW: &str = r#"
    SELECT u.email, u.id, u.username, u.first_name, u.last_name,
        EXISTS(
            SELECT 1 FROM subscription s WHERE s.user_id = ? AND s.author_id = u.id
        ) AS is_subscribed
    FROM "user" u
"#;

pub async fn find(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> anyhow::Result<Option<UserView>> {
    let sql = format!("{SELECT_USER_VIEW} WHERE u.id = ? LIMIT 1");

    Ok(sqlx::query_as::<_, UserView>(&sql)
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn list(
    pool: &SqlitePool,
    pagination: Pagination,
    viewer: Option<i64>,
) -> anyhow::Result<Page<UserView>> {
    let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "user""#)
        .fetch_one(pool)
        .await?;

    let sql = format!("{SELECT_USER_VIEW} ORDER BY u.username LIMIT ? OFFSET ?");
    let users = sqlx::query_as::<_, UserView>(&sql)
        .bind(viewer)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(pool)
        .await?;

    Ok(Page::new(count as u64, pagination, users))
}

pub async fn exists(pool: &SqlitePool, id: i64) -> anyhow::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as(r#"SELECT id FROM "user" WHERE id = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

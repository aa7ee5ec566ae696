use foodgram_shared::{Page, Pagination, recipe::Summary};
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::UserView;

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes_count: i64,
    pub recipes: Vec<Summary>,
}

#[derive(FromRow)]
struct SubscriptionRow {
    #[sqlx(flatten)]
    user: UserView,
    recipes_count: i64,
}

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT u.email, u.id, u.username, u.first_name, u.last_name,
        1 AS is_subscribed,
        (SELECT COUNT(*) FROM recipe r WHERE r.author_id = u.id) AS recipes_count
    FROM subscription s
    JOIN "user" u ON u.id = s.author_id
    WHERE s.user_id = ?
"#;

/// Authors followed by `user_id`, most recent author id first.
pub async fn list(
    pool: &SqlitePool,
    user_id: i64,
    pagination: Pagination,
    recipes_limit: Option<u64>,
) -> anyhow::Result<Page<SubscriptionView>> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscription WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let sql = format!("{SELECT_SUBSCRIPTION} ORDER BY s.author_id DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, SubscriptionRow>(&sql)
        .bind(user_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(pool)
        .await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        views.push(into_view(pool, row, recipes_limit).await?);
    }

    Ok(Page::new(count as u64, pagination, views))
}

pub async fn find(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
    recipes_limit: Option<u64>,
) -> anyhow::Result<Option<SubscriptionView>> {
    let sql = format!("{SELECT_SUBSCRIPTION} AND s.author_id = ? LIMIT 1");
    let Some(row) = sqlx::query_as::<_, SubscriptionRow>(&sql)
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(into_view(pool, row, recipes_limit).await?))
}

async fn into_view(
    pool: &SqlitePool,
    row: SubscriptionRow,
    recipes_limit: Option<u64>,
) -> anyhow::Result<SubscriptionView> {
    // LIMIT -1 means no limit in SQLite
    let limit = recipes_limit.map(|l| l as i64).unwrap_or(-1);
    let recipes = sqlx::query_as::<_, Summary>(
        r#"
        SELECT id, name, image, cooking_time FROM recipe
        WHERE author_id = ?
        ORDER BY pub_date DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(row.user.id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(SubscriptionView {
        user: row.user,
        recipes_count: row.recipes_count,
        recipes,
    })
}

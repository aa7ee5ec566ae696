use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Sums ingredient amounts over every recipe in the user's cart, one item
/// per (name, unit) pair ordered by name then unit.
pub async fn aggregate(pool: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<ShoppingItem>> {
    Ok(sqlx::query_as::<_, ShoppingItem>(
        r#"
        SELECT i.name, i.measurement_unit, SUM(ri.amount) AS amount
        FROM shopping_cart c
        JOIN recipe_ingredient ri ON ri.recipe_id = c.recipe_id
        JOIN ingredient i ON i.id = ri.ingredient_id
        WHERE c.user_id = ?
        GROUP BY i.name, i.measurement_unit
        ORDER BY i.name, i.measurement_unit
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub fn format(items: &[ShoppingItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}: {} {}.", item.name, item.amount, item.measurement_unit))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text shopping list for the user's cart, empty when the cart is.
pub async fn render(pool: &SqlitePool, user_id: i64) -> anyhow::Result<String> {
    let items = aggregate(pool, user_id).await?;

    Ok(format(&items))
}

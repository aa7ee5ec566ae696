use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};
use std::collections::HashMap;

use crate::tag::Tag;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeIngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(FromRow)]
struct TagRow {
    recipe_id: i64,
    id: i64,
    name: String,
    color: String,
    slug: String,
}

#[derive(FromRow)]
struct IngredientRow {
    recipe_id: i64,
    id: i64,
    name: String,
    measurement_unit: String,
    amount: i64,
}

fn placeholders(len: usize) -> String {
    vec!["?"; len].join(", ")
}

pub(super) async fn tags(
    pool: &SqlitePool,
    recipe_ids: &[i64],
) -> anyhow::Result<HashMap<i64, Vec<Tag>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        r#"
        SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
        FROM recipe_tag rt
        JOIN tag t ON t.id = rt.tag_id
        WHERE rt.recipe_id IN ({})
        ORDER BY t.name
        "#,
        placeholders(recipe_ids.len())
    );

    let mut query = sqlx::query_as::<_, TagRow>(&sql);
    for id in recipe_ids {
        query = query.bind(*id);
    }

    let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
    for row in query.fetch_all(pool).await? {
        tags.entry(row.recipe_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            color: row.color,
            slug: row.slug,
        });
    }

    Ok(tags)
}

pub(super) async fn ingredients(
    pool: &SqlitePool,
    recipe_ids: &[i64],
) -> anyhow::Result<HashMap<i64, Vec<RecipeIngredientView>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        r#"
        SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
        FROM recipe_ingredient ri
        JOIN ingredient i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id IN ({})
        ORDER BY i.name
        "#,
        placeholders(recipe_ids.len())
    );

    let mut query = sqlx::query_as::<_, IngredientRow>(&sql);
    for id in recipe_ids {
        query = query.bind(*id);
    }

    let mut ingredients: HashMap<i64, Vec<RecipeIngredientView>> = HashMap::new();
    for row in query.fetch_all(pool).await? {
        ingredients
            .entry(row.recipe_id)
            .or_default()
            .push(RecipeIngredientView {
                id: row.id,
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            });
    }

    Ok(ingredients)
}

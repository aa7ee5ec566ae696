use foodgram_db::table::Ingredient as IngredientTable;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqlitePool, prelude::FromRow};
use std::path::Path;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// One entry of the ingredients fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub measurement_unit: String,
}

fn search_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Lists ingredients ordered by name, optionally keeping only those whose
/// name starts with `name` (case-insensitive).
pub async fn list(pool: &SqlitePool, name: Option<&str>) -> anyhow::Result<Vec<Ingredient>> {
    let prefix = name.map(search_name).filter(|n| !n.is_empty());

    let ingredients = match prefix {
        Some(prefix) => {
            sqlx::query_as::<_, Ingredient>(
                r#"
                SELECT id, name, measurement_unit FROM ingredient
                WHERE search_name LIKE ? ESCAPE '\'
                ORDER BY name, measurement_unit
                "#,
            )
            .bind(format!("{}%", escape_like(&prefix)))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredient ORDER BY name, measurement_unit",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(ingredients)
}

pub async fn find(pool: &SqlitePool, id: i64) -> anyhow::Result<Option<Ingredient>> {
    let (sql, values) = Query::select()
        .columns([
            IngredientTable::Id,
            IngredientTable::Name,
            IngredientTable::MeasurementUnit,
        ])
        .from(IngredientTable::Table)
        .and_where(Expr::col(IngredientTable::Id).eq(id))
        .limit(1)
        .build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with(&sql, values)
        .fetch_optional(pool)
        .await?)
}

/// Inserts every missing (name, unit) pair and returns how many were new.
pub async fn import(pool: &SqlitePool, items: Vec<IngredientInput>) -> anyhow::Result<u64> {
    let mut tx = pool.begin().await?;
    let mut created = 0;

    for item in items {
        let name = item.name.trim().to_owned();
        let measurement_unit = item.measurement_unit.trim().to_owned();
        if name.is_empty() || measurement_unit.is_empty() {
            tracing::warn!(?name, ?measurement_unit, "skipping incomplete ingredient");
            continue;
        }

        let statement = Query::insert()
            .into_table(IngredientTable::Table)
            .columns([
                IngredientTable::SearchName,
                IngredientTable::Name,
                IngredientTable::MeasurementUnit,
            ])
            .values_panic([
                search_name(&name).into(),
                name.into(),
                measurement_unit.into(),
            ])
            .on_conflict(
                OnConflict::columns([IngredientTable::Name, IngredientTable::MeasurementUnit])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        created += sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    Ok(created)
}

/// Reads a JSON array of `{name, measurement_unit}` objects and imports it.
pub async fn import_file(pool: &SqlitePool, path: impl AsRef<Path>) -> anyhow::Result<u64> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let items: Vec<IngredientInput> =
        serde_json::from_str(content.trim_start_matches('\u{feff}'))?;

    tracing::info!(total = items.len(), "importing ingredients");

    import(pool, items).await
}

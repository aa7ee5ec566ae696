use foodgram_db::table::Tag as TagTable;
use foodgram_shared::{Error, is_unique_violation};
use regex::Regex;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqlitePool, prelude::FromRow};
use std::sync::LazyLock;
use validator::Validate;

static RE_HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));
static RE_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(regex(path = *RE_HEX_COLOR, message = "Color must be a hex code like #E26C2D."))]
    pub color: String,
    #[validate(length(min = 1, max = 32), regex(path = *RE_SLUG, message = "Slug may only contain letters, digits, hyphens and underscores."))]
    pub slug: String,
}

fn select() -> sea_query::SelectStatement {
    Query::select()
        .columns([TagTable::Id, TagTable::Name, TagTable::Color, TagTable::Slug])
        .from(TagTable::Table)
        .to_owned()
}

pub async fn list(pool: &SqlitePool) -> anyhow::Result<Vec<Tag>> {
    let (sql, values) = select()
        .order_by(TagTable::Name, Order::Asc)
        .to_owned()
        .build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with(&sql, values).fetch_all(pool).await?)
}

pub async fn find(pool: &SqlitePool, id: i64) -> anyhow::Result<Option<Tag>> {
    let (sql, values) = select()
        .and_where(Expr::col(TagTable::Id).eq(id))
        .limit(1)
        .to_owned()
        .build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with(&sql, values)
        .fetch_optional(pool)
        .await?)
}

/// Slugs among `slugs` that no tag carries, sorted and deduplicated.
pub async fn unknown_slugs(pool: &SqlitePool, slugs: &[String]) -> anyhow::Result<Vec<String>> {
    if slugs.is_empty() {
        return Ok(vec![]);
    }

    let (sql, values) = Query::select()
        .column(TagTable::Slug)
        .from(TagTable::Table)
        .and_where(Expr::col(TagTable::Slug).is_in(slugs.iter().cloned()))
        .to_owned()
        .build_sqlx(SqliteQueryBuilder);

    let known: Vec<(String,)> = sqlx::query_as_with(&sql, values).fetch_all(pool).await?;

    let mut unknown = slugs
        .iter()
        .filter(|slug| !known.iter().any(|(known,)| known == *slug))
        .cloned()
        .collect::<Vec<_>>();
    unknown.sort();
    unknown.dedup();

    Ok(unknown)
}

pub async fn create(pool: &SqlitePool, input: TagInput) -> foodgram_shared::Result<Tag> {
    input.validate()?;

    let color = input.color.to_uppercase();
    let statement = Query::insert()
        .into_table(TagTable::Table)
        .columns([TagTable::Name, TagTable::Color, TagTable::Slug])
        .values_panic([
            input.name.to_owned().into(),
            color.to_owned().into(),
            input.slug.to_owned().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let id = match sqlx::query_with(&sql, values).execute(pool).await {
        Ok(result) => result.last_insert_rowid(),
        Err(err) if is_unique_violation(&err) => {
            return Err(Error::Duplicate(
                "A tag with that name or slug already exists.".to_owned(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Tag {
        id,
        name: input.name,
        color,
        slug: input.slug,
    })
}

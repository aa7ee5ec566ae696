mod related;

use foodgram_db::table::Recipe;
use foodgram_shared::{Page, Pagination};
use foodgram_user::UserView;
use sea_query::{Alias, Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};
use std::collections::HashMap;

use crate::tag::Tag;

pub use related::RecipeIngredientView;

/// Full read representation of a recipe, flags are relative to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    author_id: i64,
    name: String,
    image: String,
    text: String,
    cooking_time: i64,
    is_favorited: bool,
    is_in_shopping_cart: bool,
}

#[derive(Debug, Default, Clone)]
pub struct RecipesQuery {
    pub viewer: Option<i64>,
    pub author: Option<i64>,
    /// Tag slugs, a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub pagination: Pagination,
}

fn in_collection(table: &str, viewer: Option<i64>) -> Expr {
    Expr::cust_with_values(
        format!("EXISTS(SELECT 1 FROM {table} c WHERE c.recipe_id = recipe.id AND c.user_id = ?)"),
        [viewer.unwrap_or_default()],
    )
}

fn select(viewer: Option<i64>) -> SelectStatement {
    Query::select()
        .columns([
            (Recipe::Table, Recipe::Id),
            (Recipe::Table, Recipe::AuthorId),
            (Recipe::Table, Recipe::Name),
            (Recipe::Table, Recipe::Image),
            (Recipe::Table, Recipe::Text),
            (Recipe::Table, Recipe::CookingTime),
        ])
        .expr_as(in_collection("favorite", viewer), Alias::new("is_favorited"))
        .expr_as(
            in_collection("shopping_cart", viewer),
            Alias::new("is_in_shopping_cart"),
        )
        .from(Recipe::Table)
        .to_owned()
}

fn apply_filters(statement: &mut SelectStatement, query: &RecipesQuery) {
    if let Some(author) = query.author {
        statement.and_where(Expr::col((Recipe::Table, Recipe::AuthorId)).eq(author));
    }

    if !query.tags.is_empty() {
        let placeholders = vec!["?"; query.tags.len()].join(", ");
        statement.and_where(Expr::cust_with_values(
            format!(
                "recipe.id IN (SELECT rt.recipe_id FROM recipe_tag rt JOIN tag t ON t.id = rt.tag_id WHERE t.slug IN ({placeholders}))"
            ),
            query.tags.to_vec(),
        ));
    }

    // Collection filters only apply to an authenticated viewer.
    if let Some(viewer) = query.viewer {
        if query.is_favorited {
            statement.and_where(in_collection("favorite", Some(viewer)));
        }

        if query.is_in_shopping_cart {
            statement.and_where(in_collection("shopping_cart", Some(viewer)));
        }
    }
}

async fn into_views(
    pool: &SqlitePool,
    rows: Vec<RecipeRow>,
    viewer: Option<i64>,
) -> anyhow::Result<Vec<RecipeView>> {
    let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
    let mut tags = related::tags(pool, &ids).await?;
    let mut ingredients = related::ingredients(pool, &ids).await?;
    let mut authors: HashMap<i64, UserView> = HashMap::new();

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let author = match authors.get(&row.author_id) {
            Some(author) => author.clone(),
            None => {
                let Some(author) = foodgram_user::find(pool, row.author_id, viewer).await? else {
                    anyhow::bail!("author {} of recipe {} not found", row.author_id, row.id);
                };
                authors.insert(row.author_id, author.clone());
                author
            }
        };

        views.push(RecipeView {
            id: row.id,
            tags: tags.remove(&row.id).unwrap_or_default(),
            author,
            ingredients: ingredients.remove(&row.id).unwrap_or_default(),
            is_favorited: row.is_favorited,
            is_in_shopping_cart: row.is_in_shopping_cart,
            name: row.name,
            image: row.image,
            text: row.text,
            cooking_time: row.cooking_time,
        });
    }

    Ok(views)
}

pub async fn find(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> anyhow::Result<Option<RecipeView>> {
    let (sql, values) = select(viewer)
        .and_where(Expr::col((Recipe::Table, Recipe::Id)).eq(id))
        .limit(1)
        .to_owned()
        .build_sqlx(SqliteQueryBuilder);

    let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    Ok(into_views(pool, vec![row], viewer).await?.pop())
}

/// Filtered recipes, newest first.
pub async fn list(pool: &SqlitePool, query: RecipesQuery) -> anyhow::Result<Page<RecipeView>> {
    let mut count_statement = Query::select()
        .expr(Expr::cust("COUNT(*)"))
        .from(Recipe::Table)
        .to_owned();
    apply_filters(&mut count_statement, &query);

    let (sql, values) = count_statement.build_sqlx(SqliteQueryBuilder);
    let (count,): (i64,) = sqlx::query_as_with(&sql, values).fetch_one(pool).await?;

    let mut statement = select(query.viewer);
    apply_filters(&mut statement, &query);
    statement
        .order_by((Recipe::Table, Recipe::PubDate), Order::Desc)
        .order_by((Recipe::Table, Recipe::Id), Order::Desc)
        .limit(query.pagination.limit())
        .offset(query.pagination.offset());

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    let views = into_views(pool, rows, query.viewer).await?;

    Ok(Page::new(count as u64, query.pagination, views))
}

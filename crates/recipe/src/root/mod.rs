use foodgram_db::table::{Recipe, RecipeIngredient, RecipeTag};
use foodgram_shared::{Error, State, is_foreign_key_violation};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};
use std::ops::Deref;

use crate::{
    MediaStore,
    collection::{self, Kind},
};

mod create;
mod delete;
mod input;
mod update;

pub use input::{IngredientAmount, RecipeInput};

#[derive(Clone)]
pub struct Command {
    state: State,
    media: MediaStore,
    pub favorite: collection::Command,
    pub shopping_cart: collection::Command,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct Ownership {
    pub author_id: i64,
    pub image: String,
}

impl Command {
    pub fn new(state: State, media: MediaStore) -> Self {
        Self {
            favorite: collection::Command::new(state.clone(), Kind::Favorite),
            shopping_cart: collection::Command::new(state.clone(), Kind::ShoppingCart),
            media,
            state,
        }
    }

    /// Loads the recipe and checks that `user_id` wrote it.
    pub(crate) async fn authorize(
        &self,
        user_id: i64,
        recipe_id: i64,
    ) -> foodgram_shared::Result<Ownership> {
        let (sql, values) = Query::select()
            .columns([Recipe::AuthorId, Recipe::Image])
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        let Some(ownership) = sqlx::query_as_with::<_, Ownership, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            foodgram_shared::not_found!("Recipe {recipe_id} not found.");
        };

        if ownership.author_id != user_id {
            return Err(Error::Forbidden);
        }

        Ok(ownership)
    }
}

/// Inserts the ingredient amounts and tags of a recipe.
pub(crate) async fn insert_relations(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    input: &RecipeInput,
) -> foodgram_shared::Result<()> {
    let mut statement = Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for ingredient in input.ingredients.iter() {
        statement.values_panic([
            recipe_id.into(),
            ingredient.id.into(),
            ingredient.amount.into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            stale_reference(err, "ingredients", "An ingredient no longer exists.")
        })?;

    let mut statement = Query::insert()
        .into_table(RecipeTag::Table)
        .columns([RecipeTag::RecipeId, RecipeTag::TagId])
        .to_owned();

    for tag_id in input.tags.iter() {
        statement.values_panic([recipe_id.into(), (*tag_id).into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values)
        .execute(&mut *conn)
        .await
        .map_err(|err| stale_reference(err, "tags", "A tag no longer exists."))?;

    Ok(())
}

/// A reference removed after validation surfaces as a field error.
fn stale_reference(err: sqlx::Error, field: &'static str, message: &'static str) -> Error {
    if is_foreign_key_violation(&err) {
        Error::field(field, message)
    } else {
        err.into()
    }
}

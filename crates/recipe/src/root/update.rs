use foodgram_db::table::{Recipe, RecipeIngredient, RecipeTag};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{RecipeInput, RecipeView};

impl super::Command {
    /// Replaces the recipe's ingredients and tags, and any of name, text,
    /// cooking time and image that are present in `input`.
    pub async fn update(
        &self,
        user_id: i64,
        recipe_id: i64,
        input: RecipeInput,
    ) -> foodgram_shared::Result<RecipeView> {
        let ownership = self.authorize(user_id, recipe_id).await?;
        let valid = input.check(&self.read_db, false).await?;

        let image = match valid.image {
            Some(image) => Some(self.media.save(image).await?),
            None => None,
        };

        let mut changes: Vec<(Recipe, Expr)> = vec![];
        if let Some(name) = input.name.to_owned() {
            changes.push((Recipe::Name, Expr::value(name)));
        }
        if let Some(text) = input.text.to_owned() {
            changes.push((Recipe::Text, Expr::value(text)));
        }
        if let Some(cooking_time) = input.cooking_time {
            changes.push((Recipe::CookingTime, Expr::value(cooking_time)));
        }
        if let Some(image) = image.to_owned() {
            changes.push((Recipe::Image, Expr::value(image)));
        }

        let result: foodgram_shared::Result<()> = async {
            let mut tx = self.write_db.begin().await?;

            if !changes.is_empty() {
                let (sql, values) = Query::update()
                    .table(Recipe::Table)
                    .values(changes)
                    .and_where(Expr::col(Recipe::Id).eq(recipe_id))
                    .build_sqlx(SqliteQueryBuilder);
                sqlx::query_with(&sql, values).execute(&mut *tx).await?;
            }

            let (sql, values) = Query::delete()
                .from_table(RecipeIngredient::Table)
                .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id))
                .build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;

            let (sql, values) = Query::delete()
                .from_table(RecipeTag::Table)
                .and_where(Expr::col(RecipeTag::RecipeId).eq(recipe_id))
                .build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;

            super::insert_relations(&mut tx, recipe_id, &input).await?;
            tx.commit().await?;

            Ok(())
        }
        .await;

        match (result, image) {
            (Ok(_), Some(_)) => self.media.remove(&ownership.image).await,
            (Ok(_), None) => {}
            (Err(err), image) => {
                if let Some(image) = image {
                    self.media.remove(&image).await;
                }

                return Err(err);
            }
        }

        tracing::info!(recipe_id, user_id, "recipe updated");

        let Some(view) = crate::find(&self.write_db, recipe_id, Some(user_id)).await? else {
            foodgram_shared::not_found!("Recipe {recipe_id} not found.");
        };

        Ok(view)
    }
}

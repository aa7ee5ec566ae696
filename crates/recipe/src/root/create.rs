use foodgram_db::table::Recipe;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use time::OffsetDateTime;

use crate::{RecipeInput, RecipeView};

impl super::Command {
    pub async fn create(
        &self,
        author_id: i64,
        input: RecipeInput,
    ) -> foodgram_shared::Result<RecipeView> {
        let valid = input.check(&self.read_db, true).await?;

        let (Some(name), Some(text), Some(cooking_time), Some(image)) = (
            input.name.to_owned(),
            input.text.to_owned(),
            input.cooking_time,
            valid.image,
        ) else {
            foodgram_shared::bail!("Recipe input passed validation with missing fields");
        };

        let image = self.media.save(image).await?;

        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::AuthorId,
                Recipe::Name,
                Recipe::Image,
                Recipe::Text,
                Recipe::CookingTime,
                Recipe::PubDate,
            ])
            .values_panic([
                author_id.into(),
                name.into(),
                image.to_owned().into(),
                text.into(),
                cooking_time.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let result: foodgram_shared::Result<i64> = async {
            let mut tx = self.write_db.begin().await?;
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            let id = sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

            super::insert_relations(&mut tx, id, &input).await?;
            tx.commit().await?;

            Ok(id)
        }
        .await;

        let id = match result {
            Ok(id) => id,
            Err(err) => {
                self.media.remove(&image).await;
                return Err(err);
            }
        };

        tracing::info!(recipe_id = id, author_id, "recipe created");

        let Some(view) = crate::find(&self.write_db, id, Some(author_id)).await? else {
            foodgram_shared::bail!("Recipe {id} vanished after insert");
        };

        Ok(view)
    }
}

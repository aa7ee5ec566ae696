use foodgram_db::table::Recipe;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    /// Deletes the recipe, its relations and collection entries go with it.
    pub async fn delete(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        let ownership = self.authorize(user_id, recipe_id).await?;

        let (sql, values) = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        self.media.remove(&ownership.image).await;

        tracing::info!(recipe_id, user_id, "recipe deleted");

        Ok(())
    }
}

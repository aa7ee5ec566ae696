use foodgram_shared::{Error, State, is_foreign_key_violation, is_unique_violation, recipe::Summary};
use std::ops::Deref;
use time::OffsetDateTime;

/// Per-user recipe collections, the variant name is the backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    Favorite,
    ShoppingCart,
}

impl Kind {
    fn label(&self) -> &'static str {
        match self {
            Kind::Favorite => "favorites",
            Kind::ShoppingCart => "shopping cart",
        }
    }
}

#[derive(Clone)]
pub struct Command {
    state: State,
    kind: Kind,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

async fn find_summary(pool: &sqlx::SqlitePool, recipe_id: i64) -> anyhow::Result<Option<Summary>> {
    Ok(sqlx::query_as::<_, Summary>(
        "SELECT id, name, image, cooking_time FROM recipe WHERE id = ? LIMIT 1",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?)
}

impl Command {
    pub(crate) fn new(state: State, kind: Kind) -> Self {
        Self { state, kind }
    }

    /// Puts `recipe_id` into the user's collection.
    pub async fn add(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<Summary> {
        let Some(summary) = find_summary(&self.read_db, recipe_id).await? else {
            foodgram_shared::not_found!("Recipe {recipe_id} not found.");
        };

        let sql = format!(
            "INSERT INTO {} (user_id, recipe_id, created_at) VALUES (?, ?, ?)",
            self.kind
        );

        match sqlx::query(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .bind(OffsetDateTime::now_utc().unix_timestamp())
            .execute(&self.write_db)
            .await
        {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                foodgram_shared::duplicate!("Recipe is already in your {}.", self.kind.label());
            }
            Err(err) if is_foreign_key_violation(&err) => {
                foodgram_shared::not_found!("Recipe {recipe_id} not found.");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user_id, recipe_id, collection = %self.kind, "recipe added");

        Ok(summary)
    }

    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        if find_summary(&self.read_db, recipe_id).await?.is_none() {
            foodgram_shared::not_found!("Recipe {recipe_id} not found.");
        }

        let sql = format!(
            "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
            self.kind
        );

        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotInCollection(format!(
                "Recipe is not in your {}.",
                self.kind.label()
            )));
        }

        tracing::info!(user_id, recipe_id, collection = %self.kind, "recipe removed");

        Ok(())
    }

    pub async fn contains(&self, user_id: i64, recipe_id: i64) -> anyhow::Result<bool> {
        let sql = format!(
            "SELECT 1 FROM {} WHERE user_id = ? AND recipe_id = ? LIMIT 1",
            self.kind
        );

        let row: Option<(i64,)> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .fetch_optional(&self.read_db)
            .await?;

        Ok(row.is_some())
    }
}

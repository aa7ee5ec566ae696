mod query;

use foodgram_db::table::Subscription;
use foodgram_shared::{Error, State, is_foreign_key_violation, is_unique_violation};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use std::ops::Deref;
use time::OffsetDateTime;

pub use query::*;

#[derive(Clone)]
pub struct Command(pub(crate) State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    /// Follows `author_id` on behalf of `user_id`.
    pub async fn subscribe(
        &self,
        user_id: i64,
        author_id: i64,
        recipes_limit: Option<u64>,
    ) -> foodgram_shared::Result<SubscriptionView> {
        if user_id == author_id {
            return Err(Error::field(
                "non_field_errors",
                "You cannot subscribe to yourself.",
            ));
        }

        if !crate::exists(&self.read_db, author_id).await? {
            foodgram_shared::not_found!("User {author_id} not found.");
        }

        let statement = Query::insert()
            .into_table(Subscription::Table)
            .columns([
                Subscription::UserId,
                Subscription::AuthorId,
                Subscription::CreatedAt,
            ])
            .values_panic([
                user_id.into(),
                author_id.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                foodgram_shared::duplicate!("You are already subscribed to this author.");
            }
            Err(err) if is_foreign_key_violation(&err) => {
                foodgram_shared::not_found!("User {author_id} not found.");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user_id, author_id, "subscribed");

        let Some(view) = find(&self.write_db, user_id, author_id, recipes_limit).await? else {
            foodgram_shared::bail!("Subscription {user_id} -> {author_id} vanished after insert");
        };

        Ok(view)
    }

    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        if !crate::exists(&self.read_db, author_id).await? {
            foodgram_shared::not_found!("User {author_id} not found.");
        }

        let statement = Query::delete()
            .from_table(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotInCollection(
                "You are not subscribed to this author.".to_owned(),
            ));
        }

        tracing::info!(user_id, author_id, "unsubscribed");

        Ok(())
    }
}

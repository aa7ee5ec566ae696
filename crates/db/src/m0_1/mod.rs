mod favorite;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod recipe_tag;
mod shopping_cart;
mod subscription;
mod tag;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "foodgram",
    "m0_1",
    vec_box![],
    vec_box![
        user::CreateTable,
        subscription::CreateTable,
        tag::CreateTable,
        ingredient::CreateTable,
        recipe::CreateTable,
        recipe_ingredient::CreateTable,
        recipe_tag::CreateTable,
        favorite::CreateTable,
        shopping_cart::CreateTable
    ]
);

async fn execute_all(
    connection: &mut sqlx::SqliteConnection,
    statements: Vec<String>,
) -> Result<(), sqlx_migrator::Error> {
    for statement in statements {
        sqlx::query(&statement).execute(&mut *connection).await?;
    }

    Ok(())
}

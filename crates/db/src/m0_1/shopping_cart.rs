use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, SqliteQueryBuilder,
    Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{ShoppingCart, Recipe, User};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(ShoppingCart::Table)
        .col(ColumnDef::new(ShoppingCart::UserId).integer().not_null())
        .col(ColumnDef::new(ShoppingCart::RecipeId).integer().not_null())
        .col(ColumnDef::new(ShoppingCart::CreatedAt).big_integer().not_null())
        .primary_key(Index::create().col(ShoppingCart::UserId).col(ShoppingCart::RecipeId))
        .foreign_key(
            ForeignKey::create()
                .name("fk_shopping_cart_user")
                .from(ShoppingCart::Table, ShoppingCart::UserId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_shopping_cart_recipe")
                .from(ShoppingCart::Table, ShoppingCart::RecipeId)
                .to(Recipe::Table, Recipe::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn create_recipe_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_shopping_cart_recipe")
        .table(ShoppingCart::Table)
        .col(ShoppingCart::RecipeId)
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(ShoppingCart::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        super::execute_all(
            connection,
            vec![
                create_table().to_string(SqliteQueryBuilder),
                create_recipe_idx().to_string(SqliteQueryBuilder),
            ],
        )
        .await
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        super::execute_all(connection, vec![drop_table().to_string(SqliteQueryBuilder)]).await
    }
}

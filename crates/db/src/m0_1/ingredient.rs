use sea_query::{
    ColumnDef, Index, IndexCreateStatement, SqliteQueryBuilder, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Ingredient;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Ingredient::Table)
        .col(
            ColumnDef::new(Ingredient::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Ingredient::Name).string_len(128).not_null())
        .col(
            ColumnDef::new(Ingredient::SearchName)
                .string_len(128)
                .not_null(),
        )
        .col(
            ColumnDef::new(Ingredient::MeasurementUnit)
                .string_len(64)
                .not_null(),
        )
        .to_owned()
}

fn create_name_unit_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_ingredient_name_unit")
        .table(Ingredient::Table)
        .unique()
        .col(Ingredient::Name)
        .col(Ingredient::MeasurementUnit)
        .to_owned()
}

fn create_search_name_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_ingredient_search_name")
        .table(Ingredient::Table)
        .col(Ingredient::SearchName)
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Ingredient::Table).to_owned()
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
                create_name_unit_idx().to_string(SqliteQueryBuilder),
                create_search_name_idx().to_string(SqliteQueryBuilder),
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

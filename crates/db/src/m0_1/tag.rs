use sea_query::{
    ColumnDef, Index, IndexCreateStatement, SqliteQueryBuilder, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Tag;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Tag::Table)
        .col(
            ColumnDef::new(Tag::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Tag::Name).string_len(32).not_null())
        .col(ColumnDef::new(Tag::Color).string_len(7).not_null())
        .col(ColumnDef::new(Tag::Slug).string_len(32).not_null())
        .to_owned()
}

fn create_name_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_tag_name")
        .table(Tag::Table)
        .unique()
        .col(Tag::Name)
        .to_owned()
}

fn create_slug_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_tag_slug")
        .table(Tag::Table)
        .unique()
        .col(Tag::Slug)
        .to_owned()
}

fn create_name_color_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_tag_name_color")
        .table(Tag::Table)
        .unique()
        .col(Tag::Name)
        .col(Tag::Color)
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Tag::Table).to_owned()
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
                create_name_idx().to_string(SqliteQueryBuilder),
                create_slug_idx().to_string(SqliteQueryBuilder),
                create_name_color_idx().to_string(SqliteQueryBuilder),
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

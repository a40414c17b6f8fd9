//! Create `county` table, the root of the reference hierarchy.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(County::Table)
                    .if_not_exists()
                    .col(pk_auto(County::Code))
                    .col(string_len(County::Name, 30).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(County::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum County { Table, Code, Name }

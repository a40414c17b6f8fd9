//! Create `district` table with FK to `county`.
//!
//! Deletes are restricted at the schema level; the fallback to the
//! unspecified row is an explicit application-level rewrite.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(District::Table)
                    .if_not_exists()
                    .col(pk_auto(District::Code))
                    .col(string_len(District::Name, 30).not_null())
                    .col(string_len(District::Abbreviation, 2).not_null())
                    .col(integer(District::CountyCode).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_district_county")
                            .from(District::Table, District::CountyCode)
                            .to(County::Table, County::Code)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(District::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum District { Table, Code, Name, Abbreviation, CountyCode }

#[derive(DeriveIden)]
enum County { Table, Code }

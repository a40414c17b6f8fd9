//! Create `school` table with address fields and FK to `district`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(School::Table)
                    .if_not_exists()
                    .col(pk_auto(School::Code))
                    .col(string_len(School::Name, 100).not_null())
                    .col(string_len(School::Abbreviation, 10).not_null())
                    .col(string_len(School::Street, 100).not_null())
                    .col(string_len(School::City, 100).not_null())
                    .col(string_len(School::ZipCode, 6).not_null())
                    .col(string_len(School::Email, 50).not_null())
                    .col(integer(School::DistrictCode).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_school_district")
                            .from(School::Table, School::DistrictCode)
                            .to(District::Table, District::Code)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(School::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum School { Table, Code, Name, Abbreviation, Street, City, ZipCode, Email, DistrictCode }

#[derive(DeriveIden)]
enum District { Table, Code }

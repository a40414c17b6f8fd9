//! Create `profile` table, one row per external user identity.
//!
//! Owner names are denormalized from the identity provider so the admin
//! search does not need a join into an external store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(uuid(Profile::UserId).primary_key())
                    .col(string_len(Profile::FirstName, 64).not_null())
                    .col(string_len(Profile::LastName, 64).not_null())
                    .col(string_len(Profile::Nickname, 32).not_null())
                    .col(integer(Profile::SchoolCode).not_null())
                    .col(small_integer(Profile::YearOfGraduation).not_null())
                    .col(string_len(Profile::Phone, 32).not_null())
                    .col(string_len(Profile::ParentPhone, 32).not_null())
                    .col(boolean(Profile::Gdpr).not_null())
                    .col(timestamp_with_time_zone(Profile::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Profile::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_school")
                            .from(Profile::Table, Profile::SchoolCode)
                            .to(School::Table, School::Code)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profile {
    Table,
    UserId,
    FirstName,
    LastName,
    Nickname,
    SchoolCode,
    YearOfGraduation,
    Phone,
    ParentPhone,
    Gdpr,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum School { Table, Code }

//! Add FK and filter indexes for the listing endpoints.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_district_county_code")
                    .table(District::Table)
                    .col(District::CountyCode)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_school_district_code")
                    .table(School::Table)
                    .col(School::DistrictCode)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_school_code")
                    .table(Profile::Table)
                    .col(Profile::SchoolCode)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_year_of_graduation")
                    .table(Profile::Table)
                    .col(Profile::YearOfGraduation)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_profile_year_of_graduation").table(Profile::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_profile_school_code").table(Profile::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_school_district_code").table(School::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_district_county_code").table(District::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum District { Table, CountyCode }

#[derive(DeriveIden)]
enum School { Table, DistrictCode }

#[derive(DeriveIden)]
enum Profile { Table, SchoolCode, YearOfGraduation }

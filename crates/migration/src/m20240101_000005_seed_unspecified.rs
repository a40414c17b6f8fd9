//! Seed the code-0 "unspecified" sentinel rows.
//!
//! Every reference entity keeps one placeholder row that dependents are
//! redirected to when their original target is deleted. Deleting a
//! referenced row with no sentinel in place is a configuration error.
use sea_orm_migration::prelude::*;

const UNSPECIFIED_CODE: i32 = 0;
const UNSPECIFIED_NAME: &str = "unspecified";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let county = Query::insert()
            .into_table(County::Table)
            .columns([County::Code, County::Name])
            .values_panic([UNSPECIFIED_CODE.into(), UNSPECIFIED_NAME.into()])
            .to_owned();
        manager.exec_stmt(county).await?;

        let district = Query::insert()
            .into_table(District::Table)
            .columns([
                District::Code,
                District::Name,
                District::Abbreviation,
                District::CountyCode,
            ])
            .values_panic([
                UNSPECIFIED_CODE.into(),
                UNSPECIFIED_NAME.into(),
                "".into(),
                UNSPECIFIED_CODE.into(),
            ])
            .to_owned();
        manager.exec_stmt(district).await?;

        let school = Query::insert()
            .into_table(School::Table)
            .columns([
                School::Code,
                School::Name,
                School::Abbreviation,
                School::Street,
                School::City,
                School::ZipCode,
                School::Email,
                School::DistrictCode,
            ])
            .values_panic([
                UNSPECIFIED_CODE.into(),
                UNSPECIFIED_NAME.into(),
                "".into(),
                "".into(),
                "".into(),
                "".into(),
                "".into(),
                UNSPECIFIED_CODE.into(),
            ])
            .to_owned();
        manager.exec_stmt(school).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order so the FK constraints stay satisfied
        for stmt in [
            Query::delete()
                .from_table(School::Table)
                .cond_where(Expr::col(School::Code).eq(UNSPECIFIED_CODE))
                .to_owned(),
            Query::delete()
                .from_table(District::Table)
                .cond_where(Expr::col(District::Code).eq(UNSPECIFIED_CODE))
                .to_owned(),
            Query::delete()
                .from_table(County::Table)
                .cond_where(Expr::col(County::Code).eq(UNSPECIFIED_CODE))
                .to_owned(),
        ] {
            manager.exec_stmt(stmt).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum County { Table, Code, Name }

#[derive(DeriveIden)]
enum District { Table, Code, Name, Abbreviation, CountyCode }

#[derive(DeriveIden)]
enum School { Table, Code, Name, Abbreviation, Street, City, ZipCode, Email, DistrictCode }

//! Migrator registering entity-specific migrations in dependency order.
//! The unspecified sentinel rows are seeded right after the tables that
//! hold them; indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_county;
mod m20240101_000002_create_district;
mod m20240101_000003_create_school;
mod m20240101_000004_create_profile;
mod m20240101_000005_seed_unspecified;
mod m20240101_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_county::Migration),
            Box::new(m20240101_000002_create_district::Migration),
            Box::new(m20240101_000003_create_school::Migration),
            Box::new(m20240101_000004_create_profile::Migration),
            Box::new(m20240101_000005_seed_unspecified::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000006_add_indexes::Migration),
        ]
    }
}

//! Database migrations for the CSA LOOP directory.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_03_01_000001_create_bases;
mod m2025_03_01_000002_create_farmers;
mod m2025_03_01_000003_create_farmer_bases;
mod m2025_03_01_000004_create_seasonal_products;
mod m2025_03_08_000001_create_users;
mod m2025_03_08_000002_create_users_farmers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_03_01_000001_create_bases::Migration),
            Box::new(m2025_03_01_000002_create_farmers::Migration),
            Box::new(m2025_03_01_000003_create_farmer_bases::Migration),
            Box::new(m2025_03_01_000004_create_seasonal_products::Migration),
            Box::new(m2025_03_08_000001_create_users::Migration),
            Box::new(m2025_03_08_000002_create_users_farmers::Migration),
        ]
    }
}

//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_states;
mod m20240101_000002_create_users;
mod m20240101_000003_create_amenities;
mod m20240101_000004_create_cities;
mod m20240101_000005_create_places;
mod m20240101_000006_create_place_amenity;
mod m20240101_000007_create_reviews;
mod m20240101_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_states::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_amenities::Migration),
            Box::new(m20240101_000004_create_cities::Migration),
            Box::new(m20240101_000005_create_places::Migration),
            Box::new(m20240101_000006_create_place_amenity::Migration),
            Box::new(m20240101_000007_create_reviews::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000008_add_indexes::Migration),
        ]
    }
}

//! Secondary indexes on the foreign keys used by the derived collections.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_cities_state")
                    .table(Cities::Table)
                    .col(Cities::StateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_places_city")
                    .table(Places::Table)
                    .col(Places::CityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_places_user")
                    .table(Places::Table)
                    .col(Places::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_place")
                    .table(Reviews::Table)
                    .col(Reviews::PlaceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_reviews_place").table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_places_user").table(Places::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_places_city").table(Places::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_cities_state").table(Cities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cities { Table, StateId }

#[derive(DeriveIden)]
enum Places { Table, CityId, UserId }

#[derive(DeriveIden)]
enum Reviews { Table, PlaceId }

//! Create `places` table with FKs to `cities` (location) and `users` (owner).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Places::Table)
                    .if_not_exists()
                    .col(string_len(Places::Id, 60).primary_key())
                    .col(timestamp_with_time_zone(Places::CreatedAt))
                    .col(timestamp_with_time_zone(Places::UpdatedAt))
                    .col(string_len(Places::CityId, 60))
                    .col(string_len(Places::UserId, 60))
                    .col(string_len(Places::Name, 128))
                    .col(text(Places::Description).default(""))
                    .col(big_integer(Places::NumberRooms).default(0))
                    .col(big_integer(Places::NumberBathrooms).default(0))
                    .col(big_integer(Places::MaxGuest).default(0))
                    .col(big_integer(Places::PriceByNight).default(0))
                    .col(double(Places::Latitude).default(0.0))
                    .col(double(Places::Longitude).default(0.0))
                    .col(json(Places::Extra))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_places_city")
                            .from(Places::Table, Places::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_places_user")
                            .from(Places::Table, Places::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Places::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Places {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    CityId,
    UserId,
    Name,
    Description,
    NumberRooms,
    NumberBathrooms,
    MaxGuest,
    PriceByNight,
    Latitude,
    Longitude,
    Extra,
}

#[derive(DeriveIden)]
enum Cities { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }

//! Create `states` table.
//!
//! Root of the geography tree; cities reference it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(States::Table)
                    .if_not_exists()
                    .col(string_len(States::Id, 60).primary_key())
                    .col(timestamp_with_time_zone(States::CreatedAt))
                    .col(timestamp_with_time_zone(States::UpdatedAt))
                    .col(string_len(States::Name, 128))
                    .col(json(States::Extra))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(States::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum States { Table, Id, CreatedAt, UpdatedAt, Name, Extra }

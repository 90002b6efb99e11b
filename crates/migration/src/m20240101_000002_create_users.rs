//! Create `users` table.
//!
//! Owners of places and authors of reviews. Email uniqueness is not enforced.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string_len(Users::Id, 60).primary_key())
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .col(string_len(Users::Email, 128))
                    .col(string_len(Users::Password, 128))
                    .col(string_len(Users::FirstName, 128).default(""))
                    .col(string_len(Users::LastName, 128).default(""))
                    .col(json(Users::Extra))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, CreatedAt, UpdatedAt, Email, Password, FirstName, LastName, Extra }

//! Migration to create the bases table.
//!
//! A base is a physical pickup location (cafe, hostel, market) where a
//! community hands over its produce.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bases::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Bases::Area).string_len(255).null())
                    .col(ColumnDef::new(Bases::Station).string_len(255).null())
                    .col(ColumnDef::new(Bases::Address).text().null())
                    .col(ColumnDef::new(Bases::Description).text().null())
                    .col(ColumnDef::new(Bases::BaseImageUrl).text().null())
                    .col(ColumnDef::new(Bases::GoogleMapUrl).text().null())
                    .col(
                        ColumnDef::new(Bases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Bases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Area filter on the public listing
        manager
            .create_index(
                Index::create()
                    .name("idx_bases_area")
                    .table(Bases::Table)
                    .col(Bases::Area)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_bases_area").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Bases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bases {
    Table,
    Id,
    Name,
    Area,
    Station,
    Address,
    Description,
    BaseImageUrl,
    GoogleMapUrl,
    CreatedAt,
    UpdatedAt,
}

//! Migration to create the farmers table.
//!
//! Farmers are the communities listed in the directory.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Farmers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Farmers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Farmers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Farmers::Location).string_len(255).null())
                    .col(
                        ColumnDef::new(Farmers::RepresentativeName)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(Farmers::ShortDescription).text().null())
                    .col(ColumnDef::new(Farmers::FullDescription).text().null())
                    .col(
                        ColumnDef::new(Farmers::RepresentativeImageUrl)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(Farmers::PromotionImageUrl).text().null())
                    .col(ColumnDef::new(Farmers::GoogleMapUrl).text().null())
                    .col(
                        ColumnDef::new(Farmers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Farmers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Farmers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
    Name,
    Location,
    RepresentativeName,
    ShortDescription,
    FullDescription,
    RepresentativeImageUrl,
    PromotionImageUrl,
    GoogleMapUrl,
    CreatedAt,
    UpdatedAt,
}

//! Migration to create the seasonal_products table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SeasonalProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeasonalProducts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeasonalProducts::FarmerId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SeasonalProducts::Season).string_len(50).null())
                    .col(ColumnDef::new(SeasonalProducts::Products).text().null())
                    .col(
                        ColumnDef::new(SeasonalProducts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SeasonalProducts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seasonal_products_farmer_id")
                            .from(SeasonalProducts::Table, SeasonalProducts::FarmerId)
                            .to(Farmers::Table, Farmers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seasonal_products_farmer_id")
                    .table(SeasonalProducts::Table)
                    .col(SeasonalProducts::FarmerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_seasonal_products_farmer_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SeasonalProducts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SeasonalProducts {
    Table,
    Id,
    FarmerId,
    Season,
    Products,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
}

//! Migration to create the farmer_bases table.
//!
//! Links a farmer to the base where its produce is handed over, together with
//! the delivery and interaction schedule. A farmer has exactly one link, which
//! the unique index on `farmer_id` enforces.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FarmerBases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FarmerBases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FarmerBases::FarmerId).integer().not_null())
                    .col(ColumnDef::new(FarmerBases::BaseId).integer().not_null())
                    .col(ColumnDef::new(FarmerBases::DeliveryFrequency).text().null())
                    .col(ColumnDef::new(FarmerBases::DeliveryTime).text().null())
                    .col(
                        ColumnDef::new(FarmerBases::InteractionFrequency)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FarmerBases::InteractionDetails)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FarmerBases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FarmerBases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farmer_bases_farmer_id")
                            .from(FarmerBases::Table, FarmerBases::FarmerId)
                            .to(Farmers::Table, Farmers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farmer_bases_base_id")
                            .from(FarmerBases::Table, FarmerBases::BaseId)
                            .to(Bases::Table, Bases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_farmer_bases_farmer_base")
                    .table(FarmerBases::Table)
                    .col(FarmerBases::FarmerId)
                    .col(FarmerBases::BaseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One base link per farmer
        manager
            .create_index(
                Index::create()
                    .name("idx_farmer_bases_farmer_id")
                    .table(FarmerBases::Table)
                    .col(FarmerBases::FarmerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_farmer_bases_farmer_base")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_farmer_bases_farmer_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FarmerBases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FarmerBases {
    Table,
    Id,
    FarmerId,
    BaseId,
    DeliveryFrequency,
    DeliveryTime,
    InteractionFrequency,
    InteractionDetails,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Bases {
    Table,
    Id,
}

//! Migration to create the users_farmers ownership table.
//!
//! A row grants the user edit rights on the farmer.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsersFarmers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UsersFarmers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UsersFarmers::UserId).integer().not_null())
                    .col(ColumnDef::new(UsersFarmers::FarmerId).integer().not_null())
                    .col(
                        ColumnDef::new(UsersFarmers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_farmers_user_id")
                            .from(UsersFarmers::Table, UsersFarmers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_farmers_farmer_id")
                            .from(UsersFarmers::Table, UsersFarmers::FarmerId)
                            .to(Farmers::Table, Farmers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_farmers_user_farmer")
                    .table(UsersFarmers::Table)
                    .col(UsersFarmers::UserId)
                    .col(UsersFarmers::FarmerId)
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
                    .name("idx_users_farmers_user_farmer")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UsersFarmers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UsersFarmers {
    Table,
    Id,
    UserId,
    FarmerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
}

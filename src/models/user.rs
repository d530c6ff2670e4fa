//! User entity model
//!
//! This module contains the SeaORM entity model for the users table. The
//! `password` column holds a bcrypt hash and never leaves the repository layer.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Lower-cased login address
    #[sea_orm(unique)]
    pub email: String,

    /// bcrypt hash
    pub password: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_farmer::Entity")]
    UsersFarmers,
}

impl Related<super::user_farmer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsersFarmers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

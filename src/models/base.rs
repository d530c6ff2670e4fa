//! Base entity model
//!
//! This module contains the SeaORM entity model for the bases table, which
//! stores the pickup locations where communities hand over their produce.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Pickup location shared by one or more farmers
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name of the location (required)
    pub name: String,

    /// Area label used by the public listing filter (for example `台東区エリア`)
    pub area: Option<String>,

    /// Nearest station
    pub station: Option<String>,

    pub address: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub base_image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub google_map_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::farmer_base::Entity")]
    FarmerBases,
}

impl Related<super::farmer_base::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmerBases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

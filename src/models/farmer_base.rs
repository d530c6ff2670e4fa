//! FarmerBase entity model
//!
//! Join row between a farmer and its base, carrying the delivery and
//! interaction schedule. Unique per farmer.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "farmer_bases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub farmer_id: i32,

    pub base_id: i32,

    /// How often produce is delivered to the base (for example `月1回`)
    #[sea_orm(column_type = "Text", nullable)]
    pub delivery_frequency: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub delivery_time: Option<String>,

    /// How often members can meet the farmer
    #[sea_orm(column_type = "Text", nullable)]
    pub interaction_frequency: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub interaction_details: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farmer::Entity",
        from = "Column::FarmerId",
        to = "super::farmer::Column::Id"
    )]
    Farmer,
    #[sea_orm(
        belongs_to = "super::base::Entity",
        from = "Column::BaseId",
        to = "super::base::Column::Id"
    )]
    Base,
}

impl Related<super::farmer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farmer.def()
    }
}

impl Related<super::base::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Base.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

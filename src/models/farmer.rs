//! Farmer entity model
//!
//! This module contains the SeaORM entity model for the farmers table. A farmer
//! is a community listed in the directory; it owns exactly one farmer_bases row
//! and any number of seasonal product rows.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Community listing
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "farmers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Community name (required)
    pub name: String,

    /// Where the farm itself is located
    pub location: Option<String>,

    pub representative_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub short_description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub full_description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub representative_image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub promotion_image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub google_map_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::farmer_base::Entity")]
    FarmerBases,
    #[sea_orm(has_many = "super::seasonal_product::Entity")]
    SeasonalProducts,
    #[sea_orm(has_many = "super::user_farmer::Entity")]
    UsersFarmers,
}

impl Related<super::farmer_base::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmerBases.def()
    }
}

impl Related<super::seasonal_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeasonalProducts.def()
    }
}

impl Related<super::user_farmer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsersFarmers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

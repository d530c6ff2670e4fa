//! # Farmer Repository
//!
//! Reads and writes the community aggregate: a farmer, its single farmer_bases link, its seasonal
//! products and the ownership row. Writes happen in one transaction each (see [`write`]); reads are
//! joins over the same tables (see [`read`]).

use std::sync::Arc;

use sea_orm::DatabaseConnection;

mod read;
mod write;

pub use read::{ALL_AREAS, FarmerDetail, FarmerPage, FarmerSummary, SeasonalProductView};

/// A base that does not exist yet and is created together with the farmer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBase {
    pub name: String,
    pub area: String,
    pub station: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Which base a farmer hands its produce over at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseRef {
    /// An existing `bases.id`
    Existing(i32),
    /// A base to insert first
    Custom(NewBase),
}

/// One season's listing as submitted; entries with blank `products` are dropped on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonalProductInput {
    pub season: String,
    pub products: String,
}

impl SeasonalProductInput {
    pub fn new(season: impl Into<String>, products: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            products: products.into(),
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.products.trim().is_empty()
    }
}

/// Validated create/update payload for a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmerInput {
    pub name: String,
    pub location: String,
    pub representative_name: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub representative_image_url: Option<String>,
    pub promotion_image_url: Option<String>,
    pub google_map_url: Option<String>,
    pub base: BaseRef,
    pub delivery_frequency: Option<String>,
    pub delivery_time: Option<String>,
    pub interaction_frequency: Option<String>,
    pub interaction_details: Option<String>,
    pub seasonal_products: Vec<SeasonalProductInput>,
}

impl FarmerInput {
    /// Minimal input with only the required fields set.
    pub fn new(name: impl Into<String>, location: impl Into<String>, base: BaseRef) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            representative_name: None,
            short_description: None,
            full_description: None,
            representative_image_url: None,
            promotion_image_url: None,
            google_map_url: None,
            base,
            delivery_frequency: None,
            delivery_time: None,
            interaction_frequency: None,
            interaction_details: None,
            seasonal_products: Vec::new(),
        }
    }
}

/// Repository for the farmer aggregate
#[derive(Debug, Clone)]
pub struct FarmerRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl FarmerRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

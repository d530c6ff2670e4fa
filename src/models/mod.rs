//! # Data Models
//!
//! SeaORM entities for the directory tables plus small response types shared by handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod base;
pub mod farmer;
pub mod farmer_base;
pub mod seasonal_product;
pub mod user;
pub mod user_farmer;

pub use base::Entity as Base;
pub use farmer::Entity as Farmer;
pub use farmer_base::Entity as FarmerBase;
pub use seasonal_product::Entity as SeasonalProduct;
pub use user::Entity as User;
pub use user_farmer::Entity as UserFarmer;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "csa-loop".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

//! # Repository Layer
//!
//! Repository implementations that wrap SeaORM operations for the directory tables. Each
//! repository holds an `Arc<DatabaseConnection>` and is cheap to clone per request.

pub mod base;
pub mod farmer;
pub mod user;

pub use base::{BaseOption, BaseRepository};
pub use farmer::{
    ALL_AREAS, BaseRef, FarmerDetail, FarmerInput, FarmerPage, FarmerRepository, FarmerSummary,
    NewBase, SeasonalProductInput, SeasonalProductView,
};
pub use user::{PublicUser, UserRepository};

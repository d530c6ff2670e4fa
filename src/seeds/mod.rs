//! Database seeding functionality
//!
//! Populates the directory tables with the demo communities used in local development and
//! previews.

pub mod directory;

pub use directory::{SeedOutcome, seed_directory};

//! # CSA LOOP Directory Library
//!
//! Core of the CSA LOOP directory service: configuration, persistence, the community aggregate,
//! cookie sessions, uploads and the HTTP layer.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod upload;
pub use migration;

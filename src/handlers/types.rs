//! # Common API Types
//!
//! Small response bodies shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "logged out")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a community create or update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavedResponse {
    /// Id of the created or updated community
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = true)]
    pub success: bool,
}

impl SavedResponse {
    pub fn ok(id: i32) -> Self {
        Self { id, success: true }
    }
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Returns the trimmed value when it is present and non-blank.
pub(crate) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//! # Bases API Handlers

use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::repositories::{BaseOption, BaseRepository};
use crate::server::AppState;

/// Bases available for selection
#[derive(Debug, Serialize, ToSchema)]
pub struct BasesResponse {
    pub bases: Vec<BaseOption>,
}

/// List all bases for the community form
#[utoipa::path(
    get,
    path = "/bases",
    responses(
        (status = 200, description = "All bases ordered by name", body = BasesResponse),
        (status = 401, description = "Login required", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "bases"
)]
pub async fn list_bases(
    State(state): State<AppState>,
    CurrentUser(_session): CurrentUser,
) -> Result<Json<BasesResponse>, ApiError> {
    let bases = BaseRepository::new(state.db.clone()).get_all_bases().await?;
    Ok(Json(BasesResponse { bases }))
}

//! # Communities API Handlers
//!
//! Public listing and detail views of the directory.

use axum::{
    extract::{Path, Query, State, rejection::{PathRejection, QueryRejection}},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, not_found};
use crate::repositories::{
    ALL_AREAS, BaseRepository, FarmerDetail, FarmerRepository, FarmerSummary,
};
use crate::server::AppState;

/// Query parameters for the community listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListCommunitiesQuery {
    /// Base area to filter by; omitted or `すべて` lists every area
    #[param(example = "台東区エリア")]
    pub area: Option<String>,
    /// 1-based page number (default 1)
    #[param(example = 1)]
    pub page: Option<u64>,
}

/// One page of communities plus the area filter options
#[derive(Debug, Serialize, ToSchema)]
pub struct CommunitiesResponse {
    pub farmers: Vec<FarmerSummary>,
    /// Communities matching the filter across all pages
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    /// `すべて` followed by every base area
    pub areas: Vec<String>,
    pub selected_area: String,
}

/// A single community
#[derive(Debug, Serialize, ToSchema)]
pub struct CommunityResponse {
    pub farmer: FarmerDetail,
}

/// List communities, nine per page
#[utoipa::path(
    get,
    path = "/communities",
    params(ListCommunitiesQuery),
    responses(
        (status = 200, description = "Page of communities", body = CommunitiesResponse),
        (status = 400, description = "Invalid query string", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "communities"
)]
pub async fn list_communities(
    State(state): State<AppState>,
    query: Result<Query<ListCommunitiesQuery>, QueryRejection>,
) -> Result<Json<CommunitiesResponse>, ApiError> {
    let Query(query) = query?;

    let selected_area = query
        .area
        .map(|area| area.trim().to_string())
        .filter(|area| !area.is_empty())
        .unwrap_or_else(|| ALL_AREAS.to_string());
    let page = query.page.unwrap_or(1);

    let farmers = FarmerRepository::new(state.db.clone());
    let listing = farmers
        .get_farmers_with_pagination(&selected_area, page, state.config.page_size)
        .await?;
    let areas = BaseRepository::new(state.db.clone()).get_all_areas().await?;

    let total_pages = listing.total_pages();
    Ok(Json(CommunitiesResponse {
        farmers: listing.farmers,
        total: listing.total,
        page: listing.page,
        page_size: listing.page_size,
        total_pages,
        areas,
        selected_area,
    }))
}

/// Get one community with its base and seasonal products
#[utoipa::path(
    get,
    path = "/communities/{id}",
    params(
        ("id" = i32, Path, description = "Community id")
    ),
    responses(
        (status = 200, description = "Community detail", body = CommunityResponse),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 404, description = "Community not found", body = ApiError)
    ),
    tag = "communities"
)]
pub async fn get_community(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CommunityResponse>, ApiError> {
    let Path(id) = id?;

    let farmer = FarmerRepository::new(state.db.clone())
        .get_farmer_by_id(id)
        .await?
        .ok_or_else(|| not_found("community not found"))?;

    Ok(Json(CommunityResponse { farmer }))
}

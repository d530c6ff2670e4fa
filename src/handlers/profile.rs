//! # Profile API Handlers
//!
//! Community management for the logged-in user. Every route here requires the session cookie;
//! updates additionally require ownership, which the repository checks inside its transaction.

use axum::{
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, not_found, validation_error};
use crate::handlers::communities::CommunityResponse;
use crate::handlers::types::{SavedResponse, required};
use crate::repositories::{
    BaseRef, FarmerInput, FarmerRepository, FarmerSummary, NewBase, SeasonalProductInput,
};
use crate::server::AppState;

/// A base to create together with the community
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomBasePayload {
    #[schema(example = "LOOP台東")]
    pub name: Option<String>,
    #[schema(example = "台東区エリア")]
    pub area: Option<String>,
    #[schema(example = "蔵前駅")]
    pub station: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// One season's products as submitted by the form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SeasonalProductPayload {
    #[schema(example = "3-5月")]
    pub season: Option<String>,
    /// Newline-delimited; blank entries are dropped
    #[schema(example = "にんじん\nだいこん")]
    pub products: Option<String>,
}

/// Community create/update body
///
/// `name` and `location` are required, as is either a positive `base_id` or a `custom_base`
/// with name, area and station. A complete `custom_base` takes precedence over `base_id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FarmerPayload {
    #[schema(example = "Test Farm")]
    pub name: Option<String>,
    #[schema(example = "Tokyo")]
    pub location: Option<String>,
    pub representative_name: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub representative_image_url: Option<String>,
    pub promotion_image_url: Option<String>,
    pub google_map_url: Option<String>,
    #[schema(example = 1)]
    pub base_id: Option<i32>,
    pub custom_base: Option<CustomBasePayload>,
    pub delivery_frequency: Option<String>,
    pub delivery_time: Option<String>,
    pub interaction_frequency: Option<String>,
    pub interaction_details: Option<String>,
    #[serde(default)]
    pub seasonal_products: Vec<SeasonalProductPayload>,
}

impl CustomBasePayload {
    fn complete(&self) -> Option<NewBase> {
        Some(NewBase {
            name: required(self.name.as_deref())?.to_string(),
            area: required(self.area.as_deref())?.to_string(),
            station: required(self.station.as_deref())?.to_string(),
            address: self.address.clone(),
            description: self.description.clone(),
        })
    }
}

impl FarmerPayload {
    /// Validates the body into repository input.
    pub fn into_input(self) -> Result<FarmerInput, ApiError> {
        let (Some(name), Some(location)) = (
            required(self.name.as_deref()),
            required(self.location.as_deref()),
        ) else {
            return Err(validation_error(
                "name and location are required",
                json!({
                    "name": required(self.name.as_deref()).is_some(),
                    "location": required(self.location.as_deref()).is_some(),
                }),
            ));
        };

        let custom_base = self.custom_base.as_ref().and_then(CustomBasePayload::complete);
        let base = match (custom_base, self.base_id) {
            (Some(new_base), _) => BaseRef::Custom(new_base),
            (None, Some(base_id)) if base_id > 0 => BaseRef::Existing(base_id),
            _ => {
                return Err(validation_error(
                    "select a base or enter a new base with name, area and station",
                    json!({ "field": "base_id" }),
                ));
            }
        };

        let mut input = FarmerInput::new(name, location, base);
        input.representative_name = self.representative_name;
        input.short_description = self.short_description;
        input.full_description = self.full_description;
        input.representative_image_url = self.representative_image_url;
        input.promotion_image_url = self.promotion_image_url;
        input.google_map_url = self.google_map_url;
        input.delivery_frequency = self.delivery_frequency;
        input.delivery_time = self.delivery_time;
        input.interaction_frequency = self.interaction_frequency;
        input.interaction_details = self.interaction_details;
        input.seasonal_products = self
            .seasonal_products
            .into_iter()
            .map(|entry| {
                SeasonalProductInput::new(
                    entry.season.unwrap_or_default(),
                    entry.products.unwrap_or_default(),
                )
            })
            .collect();

        Ok(input)
    }
}

/// Communities owned by the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnedCommunitiesResponse {
    pub farmers: Vec<FarmerSummary>,
}

/// Create a community owned by the caller
#[utoipa::path(
    post,
    path = "/profile/communities/create",
    request_body = FarmerPayload,
    responses(
        (status = 200, description = "Community created", body = SavedResponse),
        (status = 400, description = "Missing required fields or base", body = ApiError),
        (status = 401, description = "Login required", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn create_community(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    payload: Result<Json<FarmerPayload>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.into_input()?;

    let farmer_id = FarmerRepository::new(state.db.clone())
        .create_farmer(input, session.user_id)
        .await?;

    Ok(Json(SavedResponse::ok(farmer_id)))
}

/// Get a community for editing
#[utoipa::path(
    get,
    path = "/profile/communities/{id}",
    params(
        ("id" = i32, Path, description = "Community id")
    ),
    responses(
        (status = 200, description = "Community detail", body = CommunityResponse),
        (status = 401, description = "Login required", body = ApiError),
        (status = 404, description = "Community not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn get_community_for_edit(
    State(state): State<AppState>,
    CurrentUser(_session): CurrentUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CommunityResponse>, ApiError> {
    let Path(id) = id?;

    let farmer = FarmerRepository::new(state.db.clone())
        .get_farmer_by_id(id)
        .await?
        .ok_or_else(|| not_found("community not found"))?;

    Ok(Json(CommunityResponse { farmer }))
}

/// Update a community the caller owns
#[utoipa::path(
    put,
    path = "/profile/communities/{id}",
    params(
        ("id" = i32, Path, description = "Community id")
    ),
    request_body = FarmerPayload,
    responses(
        (status = 200, description = "Community updated", body = SavedResponse),
        (status = 400, description = "Missing required fields or base", body = ApiError),
        (status = 401, description = "Login required, or caller does not own the community", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn update_community(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<FarmerPayload>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let input = payload.into_input()?;

    let farmer_id = FarmerRepository::new(state.db.clone())
        .update_farmer(id, input, session.user_id)
        .await?;

    Ok(Json(SavedResponse::ok(farmer_id)))
}

/// List the caller's communities
#[utoipa::path(
    get,
    path = "/profile/communities",
    responses(
        (status = 200, description = "Owned communities ordered by id", body = OwnedCommunitiesResponse),
        (status = 401, description = "Login required", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "profile"
)]
pub async fn list_owned_communities(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<OwnedCommunitiesResponse>, ApiError> {
    let farmers = FarmerRepository::new(state.db.clone())
        .get_farmers_by_user(session.user_id)
        .await?;

    Ok(Json(OwnedCommunitiesResponse { farmers }))
}

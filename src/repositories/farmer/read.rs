//! Read views over the farmer aggregate.

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::FarmerRepository;
use crate::error::RepositoryError;
use crate::models::{base, farmer, farmer_base, seasonal_product, user_farmer};

/// Area filter value meaning "every area".
pub const ALL_AREAS: &str = "すべて";

/// Farmer joined with its base, as shown on listing cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct FarmerSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "まぁずファーム")]
    pub name: String,
    pub location: Option<String>,
    pub representative_name: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub representative_image_url: Option<String>,
    pub promotion_image_url: Option<String>,
    pub google_map_url: Option<String>,
    pub base_id: i32,
    pub base_name: String,
    pub base_area: Option<String>,
    pub base_station: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct FarmerDetailRow {
    id: i32,
    name: String,
    location: Option<String>,
    representative_name: Option<String>,
    short_description: Option<String>,
    full_description: Option<String>,
    representative_image_url: Option<String>,
    promotion_image_url: Option<String>,
    google_map_url: Option<String>,
    base_id: i32,
    base_name: String,
    base_area: Option<String>,
    base_station: Option<String>,
    base_address: Option<String>,
    base_description: Option<String>,
    base_image_url: Option<String>,
    base_google_map_url: Option<String>,
    delivery_frequency: Option<String>,
    delivery_time: Option<String>,
    interaction_frequency: Option<String>,
    interaction_details: Option<String>,
}

/// One season's listing on the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeasonalProductView {
    #[schema(example = "3-5月")]
    pub season: Option<String>,
    /// Newline-delimited product names
    #[schema(example = "じゃがいも\nたまねぎ")]
    pub products: Option<String>,
}

/// Full community view: farmer, base, link metadata and seasonal products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FarmerDetail {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub representative_name: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub representative_image_url: Option<String>,
    pub promotion_image_url: Option<String>,
    pub google_map_url: Option<String>,
    pub base_id: i32,
    pub base_name: String,
    pub base_area: Option<String>,
    pub base_station: Option<String>,
    pub base_address: Option<String>,
    pub base_description: Option<String>,
    pub base_image_url: Option<String>,
    pub base_google_map_url: Option<String>,
    pub delivery_frequency: Option<String>,
    pub delivery_time: Option<String>,
    pub interaction_frequency: Option<String>,
    pub interaction_details: Option<String>,
    /// Ordered by season label
    pub seasonal_products: Vec<SeasonalProductView>,
}

impl FarmerDetail {
    fn from_row(row: FarmerDetailRow, seasonal_products: Vec<SeasonalProductView>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location,
            representative_name: row.representative_name,
            short_description: row.short_description,
            full_description: row.full_description,
            representative_image_url: row.representative_image_url,
            promotion_image_url: row.promotion_image_url,
            google_map_url: row.google_map_url,
            base_id: row.base_id,
            base_name: row.base_name,
            base_area: row.base_area,
            base_station: row.base_station,
            base_address: row.base_address,
            base_description: row.base_description,
            base_image_url: row.base_image_url,
            base_google_map_url: row.base_google_map_url,
            delivery_frequency: row.delivery_frequency,
            delivery_time: row.delivery_time,
            interaction_frequency: row.interaction_frequency,
            interaction_details: row.interaction_details,
            seasonal_products,
        }
    }
}

/// One page of the public listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmerPage {
    pub farmers: Vec<FarmerSummary>,
    /// Number of farmers matching the filter across all pages
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl FarmerPage {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

/// farmers ⨝ farmer_bases ⨝ bases
fn joined() -> Select<farmer::Entity> {
    farmer::Entity::find()
        .join(JoinType::InnerJoin, farmer::Relation::FarmerBases.def())
        .join(JoinType::InnerJoin, farmer_base::Relation::Base.def())
}

fn farmer_columns(select: Select<farmer::Entity>) -> Select<farmer::Entity> {
    select
        .select_only()
        .columns([
            farmer::Column::Id,
            farmer::Column::Name,
            farmer::Column::Location,
            farmer::Column::RepresentativeName,
            farmer::Column::ShortDescription,
            farmer::Column::FullDescription,
            farmer::Column::RepresentativeImageUrl,
            farmer::Column::PromotionImageUrl,
            farmer::Column::GoogleMapUrl,
        ])
        .column_as(base::Column::Id, "base_id")
        .column_as(base::Column::Name, "base_name")
        .column_as(base::Column::Area, "base_area")
        .column_as(base::Column::Station, "base_station")
}

fn with_area(select: Select<farmer::Entity>, area: &str) -> Select<farmer::Entity> {
    if area == ALL_AREAS {
        select
    } else {
        select.filter(base::Column::Area.eq(area))
    }
}

impl FarmerRepository {
    /// Loads one community with its base, link metadata and seasonal products.
    ///
    /// Returns `Ok(None)` when the farmer does not exist or is missing its link or base.
    pub async fn get_farmer_by_id(&self, id: i32) -> Result<Option<FarmerDetail>, RepositoryError> {
        let row = farmer_columns(joined())
            .column_as(base::Column::Address, "base_address")
            .column_as(base::Column::Description, "base_description")
            .column_as(base::Column::BaseImageUrl, "base_image_url")
            .column_as(base::Column::GoogleMapUrl, "base_google_map_url")
            .columns([
                farmer_base::Column::DeliveryFrequency,
                farmer_base::Column::DeliveryTime,
                farmer_base::Column::InteractionFrequency,
                farmer_base::Column::InteractionDetails,
            ])
            .filter(farmer::Column::Id.eq(id))
            .into_model::<FarmerDetailRow>()
            .one(&*self.db)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let seasonal_products = seasonal_product::Entity::find()
            .filter(seasonal_product::Column::FarmerId.eq(id))
            .order_by_asc(seasonal_product::Column::Season)
            .order_by_asc(seasonal_product::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|product| SeasonalProductView {
                season: product.season,
                products: product.products,
            })
            .collect();

        Ok(Some(FarmerDetail::from_row(row, seasonal_products)))
    }

    /// One page of communities, optionally restricted to a base area.
    ///
    /// `page` is 1-based; values below 1 are treated as 1. A page whose offset does not fit a
    /// signed 64-bit integer is a validation error. The total comes from a separate count over the
    /// same join and filter.
    pub async fn get_farmers_with_pagination(
        &self,
        area: &str,
        page: u64,
        page_size: u64,
    ) -> Result<FarmerPage, RepositoryError> {
        let page = page.max(1);
        let offset = (page - 1)
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| RepositoryError::validation_error(format!("page {page} is out of range")))?;

        let total = with_area(joined(), area).count(&*self.db).await?;

        let farmers = with_area(farmer_columns(joined()), area)
            .order_by_asc(farmer::Column::Id)
            .offset(offset)
            .limit(page_size)
            .into_model::<FarmerSummary>()
            .all(&*self.db)
            .await?;

        tracing::debug!(area, page, total, returned = farmers.len(), "Listed communities");

        Ok(FarmerPage {
            farmers,
            total,
            page,
            page_size,
        })
    }

    /// Communities owned by `user_id`, ordered by id.
    pub async fn get_farmers_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<FarmerSummary>, RepositoryError> {
        let farmers = farmer_columns(joined())
            .join(JoinType::InnerJoin, farmer::Relation::UsersFarmers.def())
            .filter(user_farmer::Column::UserId.eq(user_id))
            .order_by_asc(farmer::Column::Id)
            .into_model::<FarmerSummary>()
            .all(&*self.db)
            .await?;

        Ok(farmers)
    }
}

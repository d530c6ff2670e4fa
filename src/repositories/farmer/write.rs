//! Create and update of the farmer aggregate.

use chrono::Utc;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait, prelude::DateTimeWithTimeZone,
};

use super::{BaseRef, FarmerInput, FarmerRepository, NewBase, SeasonalProductInput};
use crate::db::advance_id_sequence;
use crate::error::RepositoryError;
use crate::models::{base, farmer, farmer_base, seasonal_product, user_farmer};

impl FarmerRepository {
    /// Creates a community owned by `owner_user_id` and returns the new farmer id.
    ///
    /// Everything is written in one transaction. A custom base that fails to insert does not
    /// abort the create: the farmer is attached to the first existing base instead.
    pub async fn create_farmer(
        &self,
        input: FarmerInput,
        owner_user_id: i32,
    ) -> Result<i32, RepositoryError> {
        let txn = self.db.begin().await?;

        match create_in_txn(&txn, &input, owner_user_id).await {
            Ok(farmer_id) => {
                txn.commit().await?;
                counter!("csa_farmers_created_total").increment(1);
                tracing::info!(farmer_id, user_id = owner_user_id, "Created community");
                Ok(farmer_id)
            }
            Err(err) => {
                rollback(txn, "create").await;
                tracing::error!(user_id = owner_user_id, error = %err, "Failed to create community");
                Err(err)
            }
        }
    }

    /// Overwrites a community the caller owns and returns its id.
    ///
    /// Fails with [`RepositoryError::Unauthorized`] before touching any row when the caller is not
    /// an owner. Seasonal products are replaced wholesale.
    pub async fn update_farmer(
        &self,
        farmer_id: i32,
        input: FarmerInput,
        caller_user_id: i32,
    ) -> Result<i32, RepositoryError> {
        let txn = self.db.begin().await?;

        match update_in_txn(&txn, farmer_id, &input, caller_user_id).await {
            Ok(()) => {
                txn.commit().await?;
                counter!("csa_farmers_updated_total").increment(1);
                tracing::info!(farmer_id, user_id = caller_user_id, "Updated community");
                Ok(farmer_id)
            }
            Err(err) => {
                rollback(txn, "update").await;
                tracing::warn!(farmer_id, user_id = caller_user_id, error = %err, "Failed to update community");
                Err(err)
            }
        }
    }
}

async fn rollback(txn: DatabaseTransaction, operation: &str) {
    if let Err(err) = txn.rollback().await {
        tracing::error!(operation, error = %err, "Failed to roll back community transaction");
    }
}

async fn create_in_txn(
    txn: &DatabaseTransaction,
    input: &FarmerInput,
    owner_user_id: i32,
) -> Result<i32, RepositoryError> {
    let now = Utc::now().fixed_offset();

    let base_id = match &input.base {
        BaseRef::Custom(new_base) => match insert_base_in_savepoint(txn, new_base, now).await {
            Ok(base_id) => Some(base_id),
            Err(err) => {
                tracing::warn!(
                    base_name = %new_base.name,
                    error = %err,
                    "Custom base insert failed, falling back to the first existing base"
                );
                first_base_id(txn).await?
            }
        },
        BaseRef::Existing(base_id) => existing_base_id(txn, *base_id).await?,
    };
    let base_id =
        base_id.ok_or_else(|| RepositoryError::validation_error("base could not be resolved"))?;

    advance_id_sequence::<farmer::Entity, _>(txn).await?;
    let farmer = farmer::ActiveModel {
        created_at: Set(now),
        ..farmer_fields(input, now)
    }
    .insert(txn)
    .await?;

    farmer_base::ActiveModel {
        farmer_id: Set(farmer.id),
        created_at: Set(now),
        ..link_fields(input, base_id, now)
    }
    .insert(txn)
    .await?;

    insert_seasonal_products(txn, farmer.id, &input.seasonal_products, now).await?;

    user_farmer::ActiveModel {
        user_id: Set(owner_user_id),
        farmer_id: Set(farmer.id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    tracing::debug!(farmer_id = farmer.id, base_id, "Community rows inserted");
    Ok(farmer.id)
}

async fn update_in_txn(
    txn: &DatabaseTransaction,
    farmer_id: i32,
    input: &FarmerInput,
    caller_user_id: i32,
) -> Result<(), RepositoryError> {
    let owner = user_farmer::Entity::find()
        .filter(user_farmer::Column::UserId.eq(caller_user_id))
        .filter(user_farmer::Column::FarmerId.eq(farmer_id))
        .one(txn)
        .await?;
    if owner.is_none() {
        return Err(RepositoryError::unauthorized("no edit permission"));
    }

    let now = Utc::now().fixed_offset();

    // No fallback here: a custom base that cannot be inserted aborts the update.
    let base_id = match &input.base {
        BaseRef::Custom(new_base) => Some(insert_base(txn, new_base, now).await?),
        BaseRef::Existing(base_id) => existing_base_id(txn, *base_id).await?,
    };
    let base_id =
        base_id.ok_or_else(|| RepositoryError::validation_error("base could not be resolved"))?;

    let existing = farmer::Entity::find_by_id(farmer_id)
        .one(txn)
        .await?
        .ok_or_else(|| RepositoryError::not_found(format!("community {farmer_id} not found")))?;
    let mut farmer = existing.into_active_model();
    let fields = farmer_fields(input, now);
    farmer.name = fields.name;
    farmer.location = fields.location;
    farmer.representative_name = fields.representative_name;
    farmer.short_description = fields.short_description;
    farmer.full_description = fields.full_description;
    farmer.representative_image_url = fields.representative_image_url;
    farmer.promotion_image_url = fields.promotion_image_url;
    farmer.google_map_url = fields.google_map_url;
    farmer.updated_at = fields.updated_at;
    farmer.update(txn).await?;

    // Only one link row exists per farmer, so it is addressed by farmer_id alone.
    let link = farmer_base::Entity::find()
        .filter(farmer_base::Column::FarmerId.eq(farmer_id))
        .one(txn)
        .await?
        .ok_or_else(|| {
            RepositoryError::Database(DbErr::Custom(format!(
                "farmer_bases row missing for farmer {farmer_id}"
            )))
        })?;
    let mut link = link.into_active_model();
    let fields = link_fields(input, base_id, now);
    link.base_id = fields.base_id;
    link.delivery_frequency = fields.delivery_frequency;
    link.delivery_time = fields.delivery_time;
    link.interaction_frequency = fields.interaction_frequency;
    link.interaction_details = fields.interaction_details;
    link.updated_at = fields.updated_at;
    link.update(txn).await?;

    seasonal_product::Entity::delete_many()
        .filter(seasonal_product::Column::FarmerId.eq(farmer_id))
        .exec(txn)
        .await?;
    insert_seasonal_products(txn, farmer_id, &input.seasonal_products, now).await?;

    Ok(())
}

/// Inserts the base inside a savepoint so a failure leaves the outer transaction usable.
async fn insert_base_in_savepoint(
    txn: &DatabaseTransaction,
    new_base: &NewBase,
    now: DateTimeWithTimeZone,
) -> Result<i32, DbErr> {
    let savepoint = txn.begin().await?;
    match insert_base(&savepoint, new_base, now).await {
        Ok(base_id) => {
            savepoint.commit().await?;
            Ok(base_id)
        }
        Err(err) => {
            savepoint.rollback().await?;
            Err(err)
        }
    }
}

async fn insert_base(
    txn: &DatabaseTransaction,
    new_base: &NewBase,
    now: DateTimeWithTimeZone,
) -> Result<i32, DbErr> {
    advance_id_sequence::<base::Entity, _>(txn).await?;

    let base = base::ActiveModel {
        name: Set(new_base.name.trim().to_string()),
        area: Set(Some(new_base.area.trim().to_string())),
        station: Set(Some(new_base.station.trim().to_string())),
        address: Set(non_blank(&new_base.address)),
        description: Set(non_blank(&new_base.description)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    tracing::info!(base_id = base.id, "Created custom base");
    Ok(base.id)
}

async fn first_base_id(txn: &DatabaseTransaction) -> Result<Option<i32>, DbErr> {
    let first = base::Entity::find()
        .order_by_asc(base::Column::Id)
        .one(txn)
        .await?;
    Ok(first.map(|base| base.id))
}

async fn existing_base_id(txn: &DatabaseTransaction, base_id: i32) -> Result<Option<i32>, DbErr> {
    let found = base::Entity::find_by_id(base_id).one(txn).await?;
    if found.is_none() {
        tracing::warn!(base_id, "Referenced base does not exist");
    }
    Ok(found.map(|base| base.id))
}

async fn insert_seasonal_products(
    txn: &DatabaseTransaction,
    farmer_id: i32,
    entries: &[SeasonalProductInput],
    now: DateTimeWithTimeZone,
) -> Result<(), DbErr> {
    for entry in entries.iter().filter(|entry| !entry.is_blank()) {
        seasonal_product::ActiveModel {
            farmer_id: Set(farmer_id),
            season: Set(Some(entry.season.trim().to_string()).filter(|s| !s.is_empty())),
            products: Set(Some(entry.products.trim().to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

/// Editable farmer columns; `id` and `created_at` are left unset.
fn farmer_fields(input: &FarmerInput, now: DateTimeWithTimeZone) -> farmer::ActiveModel {
    farmer::ActiveModel {
        name: Set(input.name.trim().to_string()),
        location: Set(Some(input.location.trim().to_string())),
        representative_name: Set(non_blank(&input.representative_name)),
        short_description: Set(non_blank(&input.short_description)),
        full_description: Set(non_blank(&input.full_description)),
        representative_image_url: Set(non_blank(&input.representative_image_url)),
        promotion_image_url: Set(non_blank(&input.promotion_image_url)),
        google_map_url: Set(non_blank(&input.google_map_url)),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Link columns; `id`, `farmer_id` and `created_at` are left unset.
fn link_fields(
    input: &FarmerInput,
    base_id: i32,
    now: DateTimeWithTimeZone,
) -> farmer_base::ActiveModel {
    farmer_base::ActiveModel {
        base_id: Set(base_id),
        delivery_frequency: Set(non_blank(&input.delivery_frequency)),
        delivery_time: Set(non_blank(&input.delivery_time)),
        interaction_frequency: Set(non_blank(&input.interaction_frequency)),
        interaction_details: Set(non_blank(&input.interaction_details)),
        updated_at: Set(now),
        ..Default::default()
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

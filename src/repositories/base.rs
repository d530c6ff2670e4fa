//! Base repository for database operations
//!
//! Lookups over the bases table used by the profile form and the area filter.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::RepositoryError;
use crate::models::base;
use crate::repositories::farmer::ALL_AREAS;

/// Minimal projection for the base selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct BaseOption {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "LOOP台東")]
    pub name: String,
    #[schema(example = "台東区エリア")]
    pub area: Option<String>,
    pub station: Option<String>,
    pub address: Option<String>,
}

/// Repository for base database operations
#[derive(Debug, Clone)]
pub struct BaseRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All bases ordered by name.
    pub async fn get_all_bases(&self) -> Result<Vec<BaseOption>, RepositoryError> {
        let bases = base::Entity::find()
            .select_only()
            .columns([
                base::Column::Id,
                base::Column::Name,
                base::Column::Area,
                base::Column::Station,
                base::Column::Address,
            ])
            .order_by_asc(base::Column::Name)
            .order_by_asc(base::Column::Id)
            .into_model::<BaseOption>()
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(bases)
    }

    /// The "all" sentinel followed by every distinct, non-empty base area in ascending order.
    pub async fn get_all_areas(&self) -> Result<Vec<String>, RepositoryError> {
        let areas = base::Entity::find()
            .select_only()
            .column(base::Column::Area)
            .distinct()
            .filter(base::Column::Area.is_not_null())
            .filter(base::Column::Area.ne(""))
            .order_by_asc(base::Column::Area)
            .into_tuple::<String>()
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(std::iter::once(ALL_AREAS.to_string())
            .chain(areas)
            .collect())
    }
}

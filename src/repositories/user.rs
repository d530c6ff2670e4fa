//! User repository
//!
//! Registration and credential checks. Password hashes stay inside this module; callers only ever
//! see [`PublicUser`].

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use regex::Regex;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Session, hash_password, verify_password};
use crate::error::{RepositoryError, is_unique_violation};
use crate::models::user;

const MIN_PASSWORD_LEN: usize = 8;
const INVALID_CREDENTIALS: &str = "invalid email or password";
const PLACEHOLDER_PASSWORD: &str = "unregistered-account-placeholder";

fn looks_like_email(email: &str) -> Result<bool, RepositoryError> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map(|pattern| pattern.is_match(email))
        .ok_or_else(|| RepositoryError::Internal("email pattern failed to compile".to_string()))
}

/// A user as exposed over the API (no password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PublicUser {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "山田 花子")]
    pub name: String,
    #[schema(example = "hanako@example.com")]
    pub email: String,
}

impl From<user::Model> for PublicUser {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

impl PublicUser {
    /// Session payload for this user.
    pub fn session(&self) -> Session {
        Session {
            user_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Trims and lower-cases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user database operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
    bcrypt_cost: u32,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// Registers a user and returns it without the password.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, RepositoryError> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() {
            return Err(RepositoryError::validation_error("name is required"));
        }
        if !looks_like_email(&email)? {
            return Err(RepositoryError::validation_error("email is invalid"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RepositoryError::validation_error(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.find_by_email(&email).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(
                "email already registered".to_string(),
            ));
        }

        let hash = self.hash(password).await?;
        let now = Utc::now().fixed_offset();
        let created = user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email),
            password: Set(hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::AlreadyExists("email already registered".to_string())
            } else {
                RepositoryError::database_error(err)
            }
        })?;

        tracing::info!(user_id = created.id, "Registered user");
        Ok(created.into())
    }

    /// Checks credentials; unknown email and wrong password fail the same way.
    ///
    /// An unknown email is still checked against a placeholder hash so both failures cost one
    /// bcrypt verification.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, RepositoryError> {
        let found = self.find_by_email(&normalize_email(email)).await?;
        let hash = match &found {
            Some(user) => user.password.clone(),
            None => self.placeholder_hash().await?,
        };

        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|err| RepositoryError::Internal(format!("password check panicked: {err}")))?;

        match found {
            Some(user) if matches => Ok(user.into()),
            Some(user) => {
                tracing::info!(user_id = user.id, "Login rejected: wrong password");
                Err(RepositoryError::unauthorized(INVALID_CREDENTIALS))
            }
            None => {
                tracing::debug!("Login attempt for unknown email");
                Err(RepositoryError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    /// Hash verified for unknown emails, computed once at the configured cost.
    async fn placeholder_hash(&self) -> Result<String, RepositoryError> {
        static PLACEHOLDER: OnceLock<String> = OnceLock::new();

        if let Some(hash) = PLACEHOLDER.get() {
            return Ok(hash.clone());
        }
        let hash = self.hash(PLACEHOLDER_PASSWORD).await?;
        Ok(PLACEHOLDER.get_or_init(|| hash).clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, RepositoryError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    async fn hash(&self, password: &str) -> Result<String, RepositoryError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|err| RepositoryError::Internal(format!("password hashing panicked: {err}")))?
            .map_err(|err| RepositoryError::Internal(format!("password hashing failed: {err}")))
    }
}

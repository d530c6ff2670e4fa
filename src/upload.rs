//! Image uploads
//!
//! Validates where an uploaded image belongs and hands the bytes to a [`BlobStore`]. Objects are
//! keyed `{folder}/{id}/{type}.{ext}`, so re-uploading the same slot replaces the previous image.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

use crate::error::ApiError;

/// Upload validation and storage errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("folder must be one of: farmers, bases")]
    InvalidFolder,
    #[error("id must be a positive integer")]
    InvalidId,
    #[error("type must be one of: representative, promotion, base")]
    InvalidType,
    #[error("unsupported content type '{0}', expected image/jpeg, image/png or image/webp")]
    UnsupportedContentType(String),
    #[error("file is empty")]
    EmptyFile,
    #[error("file is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("blob storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::Storage(err) => {
                tracing::error!(error = %err, "Blob store write failed");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to store upload",
                )
            }
            other => ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", other.to_string()),
        }
    }
}

/// Top-level folder an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFolder {
    Farmers,
    Bases,
}

impl UploadFolder {
    pub fn parse(value: &str) -> Result<Self, UploadError> {
        match value.trim() {
            "farmers" => Ok(Self::Farmers),
            "bases" => Ok(Self::Bases),
            _ => Err(UploadError::InvalidFolder),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Farmers => "farmers",
            Self::Bases => "bases",
        }
    }
}

/// Image slot within a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Representative,
    Promotion,
    Base,
}

impl ImageKind {
    pub fn parse(value: &str) -> Result<Self, UploadError> {
        match value.trim() {
            "representative" => Ok(Self::Representative),
            "promotion" => Ok(Self::Promotion),
            "base" => Ok(Self::Base),
            _ => Err(UploadError::InvalidType),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Representative => "representative",
            Self::Promotion => "promotion",
            Self::Base => "base",
        }
    }
}

/// File extension for an accepted image content type.
pub fn extension_for(content_type: &str) -> Result<&'static str, UploadError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        _ => Err(UploadError::UnsupportedContentType(content_type.to_string())),
    }
}

/// Validated destination of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub folder: UploadFolder,
    pub id: i32,
    pub kind: ImageKind,
    extension: &'static str,
}

impl UploadTarget {
    pub fn new(
        folder: &str,
        id: &str,
        kind: &str,
        content_type: &str,
    ) -> Result<Self, UploadError> {
        let folder = UploadFolder::parse(folder)?;
        let id = id
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(UploadError::InvalidId)?;
        let kind = ImageKind::parse(kind)?;
        let extension = extension_for(content_type)?;

        Ok(Self {
            folder,
            id,
            kind,
            extension,
        })
    }

    /// Object key, e.g. `farmers/5/promotion.png`.
    pub fn key(&self) -> String {
        format!(
            "{}/{}/{}.{}",
            self.folder.as_str(),
            self.id,
            self.kind.as_str(),
            self.extension
        )
    }
}

/// Rejects empty files and files over `max_bytes`.
pub fn check_size(size: usize, max_bytes: usize) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::EmptyFile);
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(())
}

/// Public object storage for uploaded images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key`, overwriting any existing object, and returns its public URL.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str)
    -> Result<String, UploadError>;
}

/// Blob store backed by a local directory, served under `blob_url_prefix`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    upload_dir: PathBuf,
    blob_url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(upload_dir: impl Into<PathBuf>, blob_url_prefix: impl Into<String>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            blob_url_prefix: blob_url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, UploadError> {
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(UploadError::Storage(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid object key '{key}'"),
            )));
        }
        Ok(self.upload_dir.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, UploadError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(key, content_type, size = bytes.len(), "Stored upload");
        Ok(format!("{}/{}", self.blob_url_prefix, key))
    }
}

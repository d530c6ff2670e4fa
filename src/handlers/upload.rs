//! # Upload API Handler

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::server::AppState;
use crate::upload::{UploadError, UploadTarget, check_size};

/// Public URL of the stored image
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "http://localhost:8080/uploads/farmers/1/representative.png")]
    pub url: String,
}

/// Multipart form accepted by `POST /upload` (documentation only)
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Image file (image/jpeg, image/png or image/webp)
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// `farmers` or `bases`
    folder: String,
    /// Positive id of the farmer or base
    id: String,
    /// `representative`, `promotion` or `base`
    #[serde(rename = "type")]
    kind: String,
}

/// Upload an image for a farmer or base
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing field, wrong MIME type or file too large", body = ApiError),
        (status = 401, description = "Login required", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError)
    ),
    tag = "upload"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;

    let mut file: Option<(Vec<u8>, String)> = None;
    let mut folder = None;
    let mut id = None;
    let mut kind = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some((bytes.to_vec(), content_type));
            }
            "folder" => folder = Some(field.text().await?),
            "id" => id = Some(field.text().await?),
            "type" => kind = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown upload field"),
        }
    }

    let (bytes, content_type) = file.ok_or(UploadError::MissingField("file"))?;
    let folder = folder.ok_or(UploadError::MissingField("folder"))?;
    let id = id.ok_or(UploadError::MissingField("id"))?;
    let kind = kind.ok_or(UploadError::MissingField("type"))?;

    let target = UploadTarget::new(&folder, &id, &kind, &content_type)?;
    check_size(bytes.len(), state.config.upload_max_bytes)?;

    let key = target.key();
    let url = state.blob_store.put(&key, &bytes, &content_type).await?;

    tracing::info!(user_id = session.user_id, key = %key, "Image uploaded");
    Ok(Json(UploadResponse { url }))
}

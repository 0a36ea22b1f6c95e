//! Upload API endpoints
//!
//! - POST /api/v1/uploads/inspiration - Public quote form photos
//! - POST /api/v1/admin/uploads/{bucket}?folder= - Back office images
//! - GET /api/v1/admin/storage/buckets

use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::services::storage::is_raster_image;
use crate::services::{StorageError, UploadBatch, UploadFile};

/// Bucket and folder for quote form photos
const INSPIRATION_BUCKET: &str = "images";
const INSPIRATION_FOLDER: &str = "inspiration";

#[derive(Debug, Deserialize)]
pub struct FolderQuery {
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Serialize)]
pub struct BucketsResponse {
    pub buckets: Vec<String>,
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/inspiration", post(upload_inspiration))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/uploads/{bucket}", post(upload_to_bucket))
        .route("/storage/buckets", get(list_buckets))
}

/// Read every file part. Fields named `file` or `files` are accepted.
async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadFile>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" && name != "files" {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

        files.push(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(ApiError::validation_error("No file provided"));
    }
    Ok(files)
}

/// POST /api/v1/uploads/inspiration
async fn upload_inspiration(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadBatch>, ApiError> {
    let files = read_files(multipart).await?;
    if let Some(file) = files.iter().find(|f| !is_raster_image(&f.content_type)) {
        return Err(StorageError::InvalidType(file.content_type.clone()).into());
    }
    let batch = state
        .storage_service
        .upload_many(INSPIRATION_BUCKET, INSPIRATION_FOLDER, &files)
        .await;
    Ok(Json(batch))
}

/// POST /api/v1/admin/uploads/{bucket}
async fn upload_to_bucket(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    Query(query): Query<FolderQuery>,
    multipart: Multipart,
) -> Result<Json<UploadBatch>, ApiError> {
    let files = read_files(multipart).await?;

    // A single file reports its error directly.
    if let [file] = files.as_slice() {
        let stored = state.storage_service.upload(&bucket, &query.folder, file).await?;
        return Ok(Json(UploadBatch {
            files: vec![stored],
            failed: Vec::new(),
        }));
    }

    let batch = state
        .storage_service
        .upload_many(&bucket, &query.folder, &files)
        .await;
    Ok(Json(batch))
}

async fn list_buckets(State(state): State<AppState>) -> Json<BucketsResponse> {
    Json(BucketsResponse {
        buckets: state.storage_service.list_buckets().to_vec(),
    })
}

//! Bucket-scoped file storage
//!
//! Each configured bucket is a directory under `storage.path`. Stored
//! files are served read-only under `/storage/{bucket}/{path}`.

use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

use crate::config::StorageConfig;

/// Image types anonymous visitors may upload; SVG is excluded
pub const RASTER_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn is_raster_image(content_type: &str) -> bool {
    RASTER_IMAGE_TYPES.contains(&content_type)
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage bucket '{bucket}' not found. Available buckets: {available}. Please verify the bucket name and permissions.")]
    BucketNotFound { bucket: String, available: String },

    #[error("Upload failed: file type {0} is not allowed")]
    InvalidType(String),

    #[error("Upload failed: file is too large (max {max_mb} MB)")]
    TooLarge { max_mb: u64 },

    #[error("Upload failed: invalid path {0}")]
    InvalidPath(String),

    #[error("Upload failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received from a client
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file written to a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub bucket: String,
    /// Path inside the bucket, as stored on records
    pub path: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

/// Result of a multi-file upload
#[derive(Debug, Default, Serialize)]
pub struct UploadBatch {
    pub files: Vec<StoredFile>,
    pub failed: Vec<String>,
}

/// Local filesystem storage service
pub struct StorageService {
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn list_buckets(&self) -> &[String] {
        &self.config.buckets
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        if !self.config.buckets.iter().any(|b| b == bucket) {
            return Err(StorageError::BucketNotFound {
                bucket: bucket.to_string(),
                available: self.config.buckets.join(", "),
            });
        }
        Ok(self.config.path.join(bucket))
    }

    /// Store one file at `{folder}/{unix_millis}-{name}.{ext}`, replacing
    /// any file already at that path. The extension always comes from the
    /// validated content type, never from the client's file name.
    pub async fn upload(
        &self,
        bucket: &str,
        folder: &str,
        file: &UploadFile,
    ) -> Result<StoredFile, StorageError> {
        let dir = self.bucket_dir(bucket)?;

        if !self.config.is_type_allowed(&file.content_type) {
            return Err(StorageError::InvalidType(file.content_type.clone()));
        }
        if file.bytes.len() as u64 > self.config.max_file_size {
            return Err(StorageError::TooLarge {
                max_mb: self.config.max_file_size / 1024 / 1024,
            });
        }

        let folder = sanitize_folder(folder)?;
        let name = sanitize_file_name(&file.file_name);
        let file_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            file_stem(&name),
            extension_for(&file.content_type)
        );
        let path = if folder.is_empty() {
            file_name
        } else {
            format!("{}/{}", folder, file_name)
        };

        let target = dir.join(&path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &file.bytes).await?;
        tracing::info!("Stored {} ({} bytes) in bucket {}", path, file.bytes.len(), bucket);

        Ok(StoredFile {
            bucket: bucket.to_string(),
            url: public_url(bucket, &path),
            path,
            size: file.bytes.len() as u64,
            content_type: file.content_type.clone(),
        })
    }

    /// Upload files one after another. Failures are reported per file and
    /// files stored before a failure are kept.
    pub async fn upload_many(&self, bucket: &str, folder: &str, files: &[UploadFile]) -> UploadBatch {
        let mut batch = UploadBatch::default();
        for file in files {
            match self.upload(bucket, folder, file).await {
                Ok(stored) => batch.files.push(stored),
                Err(e) => {
                    tracing::warn!("Upload of {} failed: {}", file.file_name, e);
                    batch.failed.push(format!("{}: {}", file.file_name, e));
                }
            }
        }
        batch
    }
}

/// Public URL of a stored file; an empty path has no URL
pub fn public_url(bucket: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("/storage/{}/{}", bucket, path.trim_start_matches('/'))
}

/// Keep letters, digits, dot, dash and underscore; everything else
/// becomes `_`. Leading dots are dropped so names cannot be hidden files
/// or `..`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extension matching a MIME type; unknown types get `bin` so they are
/// served as opaque downloads.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/x-icon" => "ico",
        _ => "bin",
    }
}

/// Name without its last extension
fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

fn sanitize_folder(folder: &str) -> Result<String, StorageError> {
    let mut parts = Vec::new();
    for part in folder.split('/').filter(|p| !p.is_empty()) {
        if part == "." || part == ".." || part.contains('\\') {
            return Err(StorageError::InvalidPath(folder.to_string()));
        }
        if !part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return Err(StorageError::InvalidPath(folder.to_string()));
        }
        parts.push(part);
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> StorageService {
        StorageService::new(StorageConfig {
            path: dir.path().to_path_buf(),
            buckets: vec!["images".to_string(), "quotes".to_string()],
            max_file_size: 16,
            ..StorageConfig::default()
        })
    }

    fn png(name: &str, size: usize) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[tokio::test]
    async fn test_upload_writes_into_bucket_folder() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        let stored = service.upload("images", "sheds", &png("My Shed.png", 8)).await.unwrap();
        assert!(stored.path.starts_with("sheds/"));
        assert!(stored.path.ends_with("-My_Shed.png"));
        assert_eq!(stored.url, format!("/storage/images/{}", stored.path));
        assert_eq!(stored.size, 8);
        assert!(dir.path().join("images").join(&stored.path).exists());
    }

    #[tokio::test]
    async fn test_extension_follows_content_type() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        let disguised = UploadFile {
            bytes: b"<script>alert(1)</script>".to_vec(),
            ..png("evil.html", 0)
        };
        let stored = service.upload("images", "inspiration", &disguised).await.unwrap();
        assert!(stored.path.ends_with("-evil.png"), "{}", stored.path);

        let jpeg = UploadFile {
            content_type: "image/jpeg".to_string(),
            ..png("barn.jpeg.exe", 4)
        };
        let stored = service.upload("images", "", &jpeg).await.unwrap();
        assert!(stored.path.ends_with("-barn.jpeg.jpg"), "{}", stored.path);

        let bare = service.upload("images", "", &png("photo", 4)).await.unwrap();
        assert!(bare.path.ends_with("-photo.png"), "{}", bare.path);
    }

    #[test]
    fn test_raster_types_exclude_svg() {
        assert!(is_raster_image("image/png"));
        assert!(is_raster_image("image/webp"));
        assert!(!is_raster_image("image/svg+xml"));
        assert!(!is_raster_image("text/html"));
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/x-sh"), "bin");
    }

    #[tokio::test]
    async fn test_unknown_bucket_lists_available() {
        let dir = TempDir::new().unwrap();
        let err = service(&dir).upload("videos", "", &png("a.png", 1)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Storage bucket 'videos' not found. Available buckets: images, quotes. Please verify the bucket name and permissions."
        );
    }

    #[tokio::test]
    async fn test_type_size_and_path_checks() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        let pdf = UploadFile {
            content_type: "application/pdf".to_string(),
            ..png("a.pdf", 1)
        };
        assert!(matches!(
            service.upload("images", "", &pdf).await,
            Err(StorageError::InvalidType(_))
        ));
        assert!(matches!(
            service.upload("images", "", &png("big.png", 17)).await,
            Err(StorageError::TooLarge { .. })
        ));
        assert!(matches!(
            service.upload("images", "../etc", &png("a.png", 1)).await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_many_keeps_successes() {
        let dir = TempDir::new().unwrap();
        let batch = service(&dir)
            .upload_many("quotes", "inspiration", &[png("a.png", 4), png("b.png", 100), png("c.png", 4)])
            .await;
        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.failed.len(), 1);
        assert!(batch.failed[0].starts_with("b.png: Upload failed"));
    }

    #[test]
    fn test_public_url() {
        assert_eq!(public_url("images", "sheds/1-a.png"), "/storage/images/sheds/1-a.png");
        assert_eq!(public_url("images", ""), "");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("..\\x.png"), "x.png");
        assert_eq!(sanitize_file_name(".."), "file");
        assert_eq!(sanitize_file_name("barn door (1).jpg"), "barn_door__1_.jpg");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn property_sanitized_names_stay_in_folder(name in ".{0,40}") {
            let cleaned = sanitize_file_name(&name);
            prop_assert!(!cleaned.is_empty());
            prop_assert!(!cleaned.contains('/'));
            prop_assert!(!cleaned.contains('\\'));
            prop_assert!(!cleaned.starts_with('.'));
        }
    }
}

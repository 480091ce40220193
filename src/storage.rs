use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{Credentials, Region},
    presigning::PresigningConfig,
};
use uuid::Uuid;

use crate::{config::AppConfig, error::StorageError, models::UploadFolder};

/// Lifetime of a presigned upload URL.
const UPLOAD_URL_TTL: Duration = Duration::from_secs(600);

/// Object store holding partner logos, carousel images and resource documents.
/// File bodies never pass through this service; browsers PUT them directly
/// to the URLs it hands out.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the bucket when missing. Local MinIO only.
    async fn ensure_bucket_exists(&self);

    /// Presigned PUT URL for `key`, bound to `content_type`.
    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

pub type StorageState = Arc<dyn StorageService>;

/// Builds a fresh object key for an admin upload:
/// `uploads/<folder>/<uuid>.<ext>`. The client's filename only contributes
/// its extension, so it can never pick or overwrite a key.
pub fn upload_key(folder: UploadFolder, filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string());

    format!("uploads/{}/{}.{}", folder.as_str(), Uuid::new_v4(), extension)
}

/// Drops empty, `.` and `..` segments so a key stays inside its prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect::<Vec<_>>()
        .join("/")
}

/// S3StorageClient
///
/// Works against MinIO locally and any S3-compatible provider in production.
#[derive(Clone)]
pub struct S3StorageClient {
    client: Client,
    bucket: String,
}

impl S3StorageClient {
    pub fn from_config(config: &AppConfig) -> Self {
        let credentials =
            Credentials::new(&config.s3_key, &config.s3_secret, None, None, "app-config");

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version_latest()
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .region(Region::new(config.s3_region.clone()))
            // MinIO does not resolve virtual-hosted bucket names.
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.s3_bucket.clone(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => tracing::info!(bucket = %self.bucket, "bucket created"),
            Err(e) => tracing::debug!(bucket = %self.bucket, "create_bucket skipped: {}", e),
        }
    }

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(UPLOAD_URL_TTL)
            .map_err(|e| StorageError::Presigning(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(sanitize_key(key))
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}

/// In-process store for tests. Records every key it signed; `failing()`
/// makes every call error like an unreachable provider.
#[derive(Clone, Default)]
pub struct MockStorageService {
    fail: bool,
    signed_keys: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Keys handed out so far, in order.
    pub fn signed_keys(&self) -> Vec<String> {
        self.signed_keys
            .lock()
            .map(|keys| keys.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::Request("storage unavailable".to_string()));
        }

        let key = sanitize_key(key);
        if let Ok(mut keys) = self.signed_keys.lock() {
            keys.push(key.clone());
        }
        Ok(format!("http://localhost:9000/mock-bucket/{key}?signature=fake"))
    }
}

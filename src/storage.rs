//! Object storage for uploaded media and generated certificates.
//!
//! Records only ever hold storage keys; handlers turn keys into short-lived
//! presigned URLs right before responding.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, presigning::PresigningConfig, primitives::ByteStream};
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    config::{AppConfig, StorageBackend},
    error::AppResult,
};

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `body` under a fresh key below `prefix` and return the key.
    async fn upload(&self, body: Bytes, content_type: &str, prefix: &str) -> AppResult<String>;

    /// Temporary read URL for `key`.
    async fn presign(&self, key: &str, ttl: Duration) -> AppResult<String>;
}

pub fn object_key(prefix: &str, content_type: &str) -> String {
    let extension = match content_type {
        "application/pdf" => ".pdf",
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/webp" => ".webp",
        "video/mp4" => ".mp4",
        "video/webm" => ".webm",
        _ => "",
    };
    format!("{}/{}{}", prefix.trim_end_matches('/'), Uuid::new_v4(), extension)
}

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    pub async fn from_env(bucket: String) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, body: Bytes, content_type: &str, prefix: &str) -> AppResult<String> {
        let key = object_key(prefix, content_type);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("s3 upload of {key} failed: {}", DisplayErrorContext(&e)))?;

        tracing::debug!(%key, "object uploaded");
        Ok(key)
    }

    async fn presign(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| anyhow::anyhow!("invalid presign ttl: {e}"))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| anyhow::anyhow!("presigning {key} failed: {}", DisplayErrorContext(&e)))?;
        Ok(request.uri().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub body: Bytes,
}

/// Process-local store used for development and tests.
#[derive(Default)]
pub struct MemoryStorage {
    objects: DashMap<String, StoredObject>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, body: Bytes, content_type: &str, prefix: &str) -> AppResult<String> {
        let key = object_key(prefix, content_type);
        self.objects.insert(
            key.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                body,
            },
        );
        Ok(key)
    }

    /// Like S3 presigning, this never checks that `key` is still held; a
    /// record outliving a restart gets a URL that simply fails to resolve.
    async fn presign(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let expires = Utc::now().timestamp() + ttl.as_secs() as i64;
        Ok(format!("memory://{key}?expires={expires}"))
    }
}

pub async fn build_storage(config: &AppConfig) -> Arc<dyn ObjectStorage> {
    match (config.storage_backend, &config.s3_bucket) {
        (StorageBackend::S3, Some(bucket)) => {
            tracing::info!(%bucket, "using s3 object storage");
            Arc::new(S3Storage::from_env(bucket.clone()).await)
        }
        _ => {
            tracing::warn!("using in-memory object storage; uploads are lost on restart");
            Arc::new(MemoryStorage::new())
        }
    }
}

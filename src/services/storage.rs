// src/services/storage.rs
//! Object storage for user-uploaded photos.
//!
//! The cascade only ever deletes blobs, so the store contract is a single
//! operation. S3 treats deletion of an absent key as success, which keeps
//! the operation idempotent; any SDK-level failure is surfaced to the caller.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store not configured: {0}")]
    NotConfigured(String),

    #[error("S3 operation failed: {0}")]
    S3Error(String),
}

/// Narrow contract over durable blob storage, keyed by object key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

/// S3-backed object store. The client is built once at process start from
/// the ambient AWS environment configuration and shared through AppState.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub async fn from_env(bucket: &str) -> Result<Self, StorageError> {
        if bucket.is_empty() {
            return Err(StorageError::NotConfigured(
                "AWS_BUCKET is not set".to_string(),
            ));
        }

        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;
        let client = S3Client::new(&aws_config);

        info!(bucket = %bucket, "S3 object store initialized");

        Ok(Self {
            client,
            bucket: bucket.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to delete S3 object");
                StorageError::S3Error(format!("Delete failed: {}", e))
            })?;

        info!(key = %key, "Object deleted from S3");
        Ok(())
    }
}

//! Resume object storage.
//!
//! Objects are keyed `{user_id}/{epoch_ms}_{file_name}`. Production writes to
//! S3 / MinIO; tests use an in-memory store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;

pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload resume";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;
}

/// Builds the storage key for an uploaded resume.
/// Path separators in the client-supplied name are replaced so the key
/// always has exactly one `/`.
pub fn object_key(user_id: Uuid, epoch_ms: i64, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{user_id}/{epoch_ms}_{safe_name}")
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("S3 upload to s3://{}/{} failed: {e}", self.bucket, key);
                AppError::Storage(UPLOAD_FAILED_MESSAGE.to_string())
            })?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

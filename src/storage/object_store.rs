//! Contract for the binary blob store. Buckets partition objects (one
//! bucket per movie here); objects are addressed by bucket + key. Every
//! operation may fail independently of the metadata store.

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use thiserror::Error;
use tokio::io::AsyncRead;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound { bucket: String, key: String },
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Readable handle to an object's payload, suitable for streaming out.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether the bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> ObjectStoreResult<bool>;

    /// Create a bucket. Idempotent: racing creations of the same bucket
    /// must both succeed.
    async fn create_bucket(&self, bucket: &str) -> ObjectStoreResult<()>;

    /// Write an object's full payload under `bucket`/`key`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> ObjectStoreResult<()>;

    /// Open an object for reading.
    async fn get_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<ObjectReader>;

    /// Remove an object. A missing object is not an error.
    async fn remove_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<()>;
}

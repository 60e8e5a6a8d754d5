//! Filesystem-backed object store: one directory per bucket beneath
//! `base_path`, objects stored as plain files named by key. Writes go
//! through a temp file and an fsync before the final rename so a crash
//! never leaves a partial object under its real key.

use crate::storage::object_store::{
    ObjectReader, ObjectStore, ObjectStoreError, ObjectStoreResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::{io, path::PathBuf};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct FsObjectStore {
    /// Base directory on disk where buckets live.
    base_path: PathBuf,
}

impl FsObjectStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn bucket_root(&self, bucket: &str) -> PathBuf {
        self.base_path.join(bucket)
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.bucket_root(bucket).join(key)
    }

    /// Keys and bucket names are generated by this service (uuid strings
    /// and hash-derived filenames), but guard the filesystem boundary
    /// against traversal anyway.
    fn ensure_component_safe(value: &str) -> ObjectStoreResult<()> {
        if value.is_empty()
            || value.contains('/')
            || value.contains('\\')
            || value.contains("..")
            || value.bytes().any(|b| b.is_ascii_control())
        {
            return Err(ObjectStoreError::InvalidObjectKey);
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> ObjectStoreResult<bool> {
        Self::ensure_component_safe(bucket)?;
        Ok(fs::try_exists(self.bucket_root(bucket)).await?)
    }

    async fn create_bucket(&self, bucket: &str) -> ObjectStoreResult<()> {
        Self::ensure_component_safe(bucket)?;
        // create_dir_all tolerates an existing directory, so concurrent
        // creations of the same bucket both succeed.
        fs::create_dir_all(self.bucket_root(bucket)).await?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> ObjectStoreResult<()> {
        Self::ensure_component_safe(bucket)?;
        Self::ensure_component_safe(key)?;

        let parent = self.bucket_root(bucket);
        let file_path = self.object_path(bucket, key);
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));

        let mut file = File::create(&tmp_path).await?;
        if let Err(err) = write_all_durable(&mut file, &data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ObjectStoreError::Io(err));
        }
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ObjectStoreError::Io(err));
        }

        debug!(
            "stored object {}/{} ({} bytes, {})",
            bucket,
            key,
            data.len(),
            content_type
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<ObjectReader> {
        Self::ensure_component_safe(bucket)?;
        Self::ensure_component_safe(key)?;

        let file_path = self.object_path(bucket, key);
        let file = File::open(&file_path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ObjectStoreError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                ObjectStoreError::Io(err)
            }
        })?;

        Ok(Box::new(file))
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<()> {
        Self::ensure_component_safe(bucket)?;
        Self::ensure_component_safe(key)?;

        let file_path = self.object_path(bucket, key);
        match fs::remove_file(&file_path).await {
            Ok(_) => debug!("removed object file {}", file_path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("object file {} already missing", file_path.display());
            }
            Err(err) => return Err(ObjectStoreError::Io(err)),
        }
        Ok(())
    }
}

async fn write_all_durable(file: &mut File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}

//! Image ingestion pipeline: hash, dedup against the movie's stored
//! images, insert the metadata row, then write the blob. Retrieval and
//! deletion of single images live here too.
//!
//! Consistency is deliberately eventual, not atomic. A batch that fails at
//! image K leaves images 1..K-1 fully persisted, and a blob write is not
//! verified against its metadata row. Deletion removes the row before the
//! blob, so a failed blob removal orphans bytes rather than leaving a row
//! that points at nothing.

use crate::{
    models::image::{Image, ImageDto},
    models::movie::Movie,
    services::{CatalogError, CatalogResult, hashing, validation::UploadCandidate},
    storage::{ObjectReader, ObjectStore},
};
use sqlx::SqlitePool;
use std::{collections::HashSet, sync::Arc};
use tracing::debug;
use uuid::Uuid;

/// An image opened for download.
pub struct ImageDownload {
    pub filename: String,
    pub content_type: String,
    pub reader: ObjectReader,
}

#[derive(Clone)]
pub struct ImageService {
    db: Arc<SqlitePool>,
    objects: Arc<dyn ObjectStore>,
}

impl ImageService {
    pub fn new(db: Arc<SqlitePool>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { db, objects }
    }

    /// Ingest a validated batch of images for a movie, strictly in
    /// submission order. Returns the created references in that order.
    ///
    /// Earlier images stay persisted if a later one fails; the caller sees
    /// the whole batch as failed but no rollback happens.
    pub async fn add_images(
        &self,
        movie_id: Uuid,
        images: Vec<UploadCandidate>,
    ) -> CatalogResult<Vec<ImageDto>> {
        let (movie, stored) = self.find_movie_with_images(movie_id).await?;

        let bucket = movie.id.to_string();
        // Bucket creation is awaited so the first put never races it.
        self.ensure_bucket(&bucket).await?;

        let mut existing: HashSet<String> =
            stored.into_iter().map(|image| image.filename).collect();
        let mut added = Vec::with_capacity(images.len());

        for image in images {
            let filename = hashing::storage_filename(&image.file_name, &image.bytes);

            if existing.contains(&filename) {
                return Err(CatalogError::ImageAlreadyExists);
            }

            let row = self.insert_image(movie_id, &filename).await?;
            self.objects
                .put_object(&bucket, &filename, &image.content_type, image.bytes)
                .await?;

            debug!("added image {} as {}/{}", row.id, bucket, filename);
            existing.insert(filename);
            added.push(ImageDto::from(row));
        }

        Ok(added)
    }

    /// Open an image for download. The blob is assumed to exist because
    /// the row does; a missing blob surfaces as a store failure.
    pub async fn get_image(&self, image_id: i64) -> CatalogResult<ImageDownload> {
        let image = self.find_image(image_id).await?;

        let reader = self
            .objects
            .get_object(&image.movie_id.to_string(), &image.filename)
            .await?;

        Ok(ImageDownload {
            content_type: content_type_for(&image.filename),
            filename: image.filename,
            reader,
        })
    }

    /// Delete an image: metadata row first, blob second.
    pub async fn delete_image(&self, image_id: i64) -> CatalogResult<()> {
        let image = self.find_image(image_id).await?;

        self.remove_image(image_id).await?;
        self.objects
            .remove_object(&image.movie_id.to_string(), &image.filename)
            .await?;

        debug!("deleted image {} ({})", image_id, image.filename);
        Ok(())
    }

    async fn ensure_bucket(&self, bucket: &str) -> CatalogResult<()> {
        if !self.objects.bucket_exists(bucket).await? {
            self.objects.create_bucket(bucket).await?;
        }
        Ok(())
    }

    /// Fetch a movie with its images eagerly loaded.
    async fn find_movie_with_images(&self, movie_id: Uuid) -> CatalogResult<(Movie, Vec<Image>)> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date FROM movies WHERE id = ?",
        )
        .bind(movie_id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => CatalogError::MovieNotFound(movie_id),
            other => CatalogError::Metadata(other),
        })?;

        let images =
            sqlx::query_as::<_, Image>("SELECT id, movie_id, filename FROM images WHERE movie_id = ?")
                .bind(movie_id)
                .fetch_all(&*self.db)
                .await?;

        Ok((movie, images))
    }

    async fn insert_image(&self, movie_id: Uuid, filename: &str) -> CatalogResult<Image> {
        let image = sqlx::query_as::<_, Image>(
            "INSERT INTO images (movie_id, filename) VALUES (?, ?)
             RETURNING id, movie_id, filename",
        )
        .bind(movie_id)
        .bind(filename)
        .fetch_one(&*self.db)
        .await?;

        Ok(image)
    }

    async fn find_image(&self, image_id: i64) -> CatalogResult<Image> {
        sqlx::query_as::<_, Image>("SELECT id, movie_id, filename FROM images WHERE id = ?")
            .bind(image_id)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => CatalogError::ImageNotFound(image_id),
                other => CatalogError::Metadata(other),
            })
    }

    async fn remove_image(&self, image_id: i64) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(image_id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ImageNotFound(image_id));
        }
        Ok(())
    }
}

/// Content type for a download, derived from the stored filename's
/// extension rather than re-inspecting bytes.
fn content_type_for(filename: &str) -> String {
    match filename.rsplit('.').next().unwrap_or_default() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

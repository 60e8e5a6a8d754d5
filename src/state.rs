//! Shared application state handed to every handler.

use crate::{
    services::{image_service::ImageService, movie_service::MovieService},
    storage::{FsObjectStore, ObjectStore},
};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    /// Shared SQLite pool, also probed by the readiness check.
    pub db: Arc<SqlitePool>,

    /// Root directory of the blob store, probed by the readiness check.
    pub storage_dir: PathBuf,

    pub movies: MovieService,
    pub images: ImageService,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>, storage_dir: impl Into<PathBuf>) -> Self {
        let storage_dir = storage_dir.into();
        let objects: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(storage_dir.clone()));

        Self {
            movies: MovieService::new(db.clone()),
            images: ImageService::new(db.clone(), objects),
            db,
            storage_dir,
        }
    }
}

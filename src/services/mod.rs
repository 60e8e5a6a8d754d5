//! Service layer: the image ingestion pipeline and the movie catalog CRUD,
//! plus the shared error taxonomy they surface to the HTTP boundary.

pub mod hashing;
pub mod image_service;
pub mod movie_service;
pub mod validation;

use crate::{services::validation::ValidationError, storage::ObjectStoreError};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the catalog services.
///
/// Everything except the two store passthroughs is a client error: it is
/// raised before (or instead of) touching external state, or identifies a
/// resource the caller got wrong.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Movie with id = {0} not found.")]
    MovieNotFound(Uuid),
    #[error("Image with id = {0} does not exist.")]
    ImageNotFound(i64),
    #[error("Image already exists.")]
    ImageAlreadyExists,
    #[error("Release date must be in the format YYYY-MM-DD.")]
    InvalidReleaseDate,
    #[error("Release date cannot be in the future.")]
    ReleaseInFuture,
    #[error("Movie already exists.")]
    MovieAlreadyExists,
    #[error("Page number is greater than total pages.")]
    PageOutOfRange,
    #[error(transparent)]
    Metadata(#[from] sqlx::Error),
    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

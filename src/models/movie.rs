//! Movie row and its request/response shapes.

use crate::models::image::ImageDto;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A movie row. Owns its images; deleting the row cascades to them.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Movie {
    /// Unique identifier, assigned by the service on creation.
    pub id: Uuid,

    /// Movie title.
    pub title: String,

    /// Movie description.
    pub description: String,

    /// Release date (calendar date, no time component).
    pub release_date: NaiveDate,
}

/// Request body for creating a movie.
#[derive(Deserialize, Debug)]
pub struct CreateMovie {
    pub title: String,
    pub description: String,
    /// Release date as `YYYY-MM-DD`.
    pub release: String,
}

/// Request body for updating a movie. Same shape as creation.
#[derive(Deserialize, Debug)]
pub struct UpdateMovie {
    pub title: String,
    pub description: String,
    pub release: String,
}

/// A movie with its images, as returned to clients.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MovieDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Release date as `YYYY-MM-DD`.
    pub release: String,
    pub images: Vec<ImageDto>,
}

impl MovieDto {
    pub fn from_row(movie: Movie, images: Vec<ImageDto>) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            release: movie.release_date.format("%Y-%m-%d").to_string(),
            images,
        }
    }
}

/// One page of movies plus paging bookkeeping.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PagedMovies {
    pub movies: Vec<MovieDto>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

//! Movie catalog CRUD over the metadata store: creation with duplicate and
//! release-date checks, retrieval with eagerly loaded images, paging, and
//! title search.

use crate::{
    models::image::{Image, ImageDto},
    models::movie::{CreateMovie, Movie, MovieDto, PagedMovies, UpdateMovie},
    services::{CatalogError, CatalogResult},
};
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use uuid::Uuid;

const MIN_PAGE_NUMBER: u32 = 1;
const MAX_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct MovieService {
    db: Arc<SqlitePool>,
}

impl MovieService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    pub async fn create_movie(&self, request: CreateMovie) -> CatalogResult<MovieDto> {
        let release_date = parse_release(&request.release)?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM movies WHERE title = ? AND release_date = ?)",
        )
        .bind(&request.title)
        .bind(release_date)
        .fetch_one(&*self.db)
        .await?;

        if duplicate {
            return Err(CatalogError::MovieAlreadyExists);
        }

        let movie = Movie {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            release_date,
        };

        sqlx::query("INSERT INTO movies (id, title, description, release_date) VALUES (?, ?, ?, ?)")
            .bind(movie.id)
            .bind(&movie.title)
            .bind(&movie.description)
            .bind(movie.release_date)
            .execute(&*self.db)
            .await?;

        debug!("created movie {} ({})", movie.id, movie.title);
        Ok(MovieDto::from_row(movie, Vec::new()))
    }

    pub async fn get_movie(&self, id: Uuid) -> CatalogResult<MovieDto> {
        let movie = self.fetch_movie(id).await?;
        let images = self.fetch_images(id).await?;
        Ok(MovieDto::from_row(movie, images))
    }

    pub async fn update_movie(&self, id: Uuid, request: UpdateMovie) -> CatalogResult<MovieDto> {
        let release_date = parse_release(&request.release)?;

        let movie = self.fetch_movie(id).await?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM movies WHERE title = ? AND release_date = ? AND id != ?)",
        )
        .bind(&request.title)
        .bind(release_date)
        .bind(id)
        .fetch_one(&*self.db)
        .await?;

        if duplicate {
            return Err(CatalogError::MovieAlreadyExists);
        }

        sqlx::query("UPDATE movies SET title = ?, description = ?, release_date = ? WHERE id = ?")
            .bind(&request.title)
            .bind(&request.description)
            .bind(release_date)
            .bind(id)
            .execute(&*self.db)
            .await?;

        let images = self.fetch_images(id).await?;
        Ok(MovieDto::from_row(
            Movie {
                id: movie.id,
                title: request.title,
                description: request.description,
                release_date,
            },
            images,
        ))
    }

    /// Delete a movie. Its image rows go with it via the FK cascade; the
    /// bucket and its blobs are left behind (never served again).
    pub async fn delete_movie(&self, id: Uuid) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::MovieNotFound(id));
        }

        debug!("deleted movie {}", id);
        Ok(())
    }

    pub async fn list_movies(&self) -> CatalogResult<Vec<MovieDto>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date FROM movies ORDER BY release_date, title",
        )
        .fetch_all(&*self.db)
        .await?;

        self.with_images(movies).await
    }

    /// Skip/take paging. Page size is clamped to 1..=20 and page number to
    /// at least 1; asking past the last page is a client error.
    pub async fn paged_movies(&self, page_number: u32, page_size: u32) -> CatalogResult<PagedMovies> {
        let page_number = page_number.max(MIN_PAGE_NUMBER);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let total_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(&*self.db)
            .await? as u64;
        let total_pages = total_records.div_ceil(page_size as u64) as u32;

        if page_number > total_pages && total_pages > 0 {
            return Err(CatalogError::PageOutOfRange);
        }

        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date FROM movies
             ORDER BY release_date, title LIMIT ? OFFSET ?",
        )
        .bind(page_size as i64)
        // Offset math in i64: a huge page number on an empty catalog gets
        // past the range guard and must not overflow u32.
        .bind((page_number as i64 - 1) * page_size as i64)
        .fetch_all(&*self.db)
        .await?;

        Ok(PagedMovies {
            movies: self.with_images(movies).await?,
            page_number,
            page_size,
            total_pages,
            total_records,
        })
    }

    /// Case-insensitive substring search on title.
    pub async fn search_movies(&self, title: &str) -> CatalogResult<Vec<MovieDto>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date FROM movies
             WHERE title LIKE ? ORDER BY release_date, title",
        )
        .bind(format!("%{}%", title))
        .fetch_all(&*self.db)
        .await?;

        self.with_images(movies).await
    }

    async fn fetch_movie(&self, id: Uuid) -> CatalogResult<Movie> {
        sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date FROM movies WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => CatalogError::MovieNotFound(id),
            other => CatalogError::Metadata(other),
        })
    }

    async fn fetch_images(&self, movie_id: Uuid) -> CatalogResult<Vec<ImageDto>> {
        let images =
            sqlx::query_as::<_, Image>("SELECT id, movie_id, filename FROM images WHERE movie_id = ?")
                .bind(movie_id)
                .fetch_all(&*self.db)
                .await?;

        Ok(images.into_iter().map(ImageDto::from).collect())
    }

    /// Attach images to a set of movie rows with one grouped query.
    async fn with_images(&self, movies: Vec<Movie>) -> CatalogResult<Vec<MovieDto>> {
        if movies.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, movie_id, filename FROM images WHERE movie_id IN (",
        );
        let mut separated = builder.separated(", ");
        for movie in &movies {
            separated.push_bind(movie.id);
        }
        builder.push(")");

        let images: Vec<Image> = builder.build_query_as().fetch_all(&*self.db).await?;

        let mut by_movie: HashMap<Uuid, Vec<ImageDto>> = HashMap::new();
        for image in images {
            by_movie
                .entry(image.movie_id)
                .or_default()
                .push(ImageDto::from(image));
        }

        Ok(movies
            .into_iter()
            .map(|movie| {
                let images = by_movie.remove(&movie.id).unwrap_or_default();
                MovieDto::from_row(movie, images)
            })
            .collect())
    }
}

fn parse_release(release: &str) -> CatalogResult<NaiveDate> {
    let release_date = NaiveDate::parse_from_str(release, "%Y-%m-%d")
        .map_err(|_| CatalogError::InvalidReleaseDate)?;

    if release_date > Utc::now().date_naive() {
        return Err(CatalogError::ReleaseInFuture);
    }

    Ok(release_date)
}

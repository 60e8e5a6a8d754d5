//! HTTP handlers for movie CRUD, paging, and title search.

use crate::{
    errors::AppError,
    models::movie::{CreateMovie, UpdateMovie},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

/// Query params for `GET /movies/paged`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// Query params for `GET /movies/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
}

/// POST `/movies` — create a movie.
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovie>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movies.create_movie(request).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET `/movies` — list all movies with their images.
pub async fn list_movies(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let movies = state.movies.list_movies().await?;
    Ok(Json(movies))
}

/// GET `/movies/paged?pageNumber=&pageSize=` — skip/take paging.
pub async fn paged_movies(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state
        .movies
        .paged_movies(query.page_number.unwrap_or(1), query.page_size.unwrap_or(20))
        .await?;
    Ok(Json(page))
}

/// GET `/movies/search?title=` — case-insensitive title search.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movies.search_movies(&query.title).await?;
    Ok(Json(movies))
}

/// GET `/movies/{id}` — fetch one movie with its images.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movies.get_movie(id).await?;
    Ok(Json(movie))
}

/// PUT `/movies/{id}` — update title, description, and release date.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMovie>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movies.update_movie(id, request).await?;
    Ok(Json(movie))
}

/// DELETE `/movies/{id}` — delete a movie and (via cascade) its image rows.
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.movies.delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

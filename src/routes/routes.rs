//! Defines routes for the movie catalog and image pipeline.
//!
//! ## Structure
//! - **Movie endpoints**
//!   - `POST   /movies` — create movie
//!   - `GET    /movies` — list movies
//!   - `GET    /movies/paged` — paged listing (pageNumber, pageSize)
//!   - `GET    /movies/search` — title search
//!   - `GET    /movies/{id}` — fetch one movie
//!   - `PUT    /movies/{id}` — update movie
//!   - `DELETE /movies/{id}` — delete movie (cascades to image rows)
//!
//! - **Image endpoints** (one route entry: POST takes a movie id, GET and
//!   DELETE take an image id)
//!   - `POST   /images/{movieId}` — upload a multipart batch
//!   - `GET    /images/{id}` — download an image
//!   - `DELETE /images/{id}` — delete an image

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        image_handlers::{delete_image, get_image, upload_images},
        movie_handlers::{
            create_movie, delete_movie, get_movie, list_movies, paged_movies, search_movies,
            update_movie,
        },
    },
    services::validation::{MAX_BATCH_SIZE, MAX_IMAGE_BYTES},
    state::AppState,
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};

/// Build and return the router for all catalog routes.
///
/// The router carries shared state (`AppState`) to all handlers. The body
/// limit admits a full batch of maximum-size images plus multipart framing.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Movie routes
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/paged", get(paged_movies))
        .route("/movies/search", get(search_movies))
        .route(
            "/movies/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        // Image routes
        .route(
            "/images/{id}",
            get(get_image).post(upload_images).delete(delete_image),
        )
        .layer(DefaultBodyLimit::max(
            MAX_BATCH_SIZE * MAX_IMAGE_BYTES + 1024 * 1024,
        ))
}

//! Movie catalog service with content-addressable image storage.
//!
//! Metadata (movies, image rows) lives in SQLite; image payloads live in a
//! bucket-per-movie object store keyed by a content-hash filename.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

/// Embedded SQL migrations, run at startup and by the test harness.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

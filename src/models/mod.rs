//! Core data models for the movie catalog.
//!
//! Database rows map via `sqlx::FromRow`; request/response DTOs serialize
//! as JSON via `serde`.

pub mod image;
pub mod movie;

//! HTTP handlers for the image pipeline. Uploads arrive as multipart
//! batches; downloads stream the blob straight out of the object store.

use crate::{
    errors::AppError,
    services::{
        CatalogError,
        validation::{self, UploadCandidate},
    },
    state::AppState,
};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

/// POST `/images/{movieId}` — upload a batch of 1..=10 images.
pub async fn upload_images(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut batch = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        // Only file parts carry image payloads; skip plain form fields.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(err.to_string()))?;

        batch.push(UploadCandidate {
            file_name,
            content_type,
            bytes,
        });
    }

    validation::validate_batch(&batch).map_err(CatalogError::from)?;

    let added = state.images.add_images(movie_id, batch).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// GET `/images/{id}` — stream an image back to the caller.
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let download = state.images.get_image(id).await?;

    let body = Body::from_stream(ReaderStream::new(download.reader));
    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&download.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", download.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

/// DELETE `/images/{id}` — remove the metadata row, then the blob.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.images.delete_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

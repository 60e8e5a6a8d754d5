//! Image metadata row. The payload bytes live in the object store; the row
//! only carries identity, ownership, and the derived filename.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored image. The filename is `{base64 content hash}.{extension}` and
/// doubles as the object-store key; it is never regenerated once assigned.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Image {
    /// Store-assigned sequential identifier.
    pub id: i64,

    /// Movie this image belongs to.
    pub movie_id: Uuid,

    /// Derived filename, unique within the movie's bucket.
    pub filename: String,
}

/// Image reference returned to clients after an upload.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImageDto {
    pub id: i64,
    pub filename: String,
}

impl From<Image> for ImageDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            filename: image.filename,
        }
    }
}

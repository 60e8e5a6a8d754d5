//! Gate for incoming image batches. Checks run in a fixed order and the
//! first failure wins; nothing is persisted until the whole batch passes.

use crate::services::hashing;
use bytes::Bytes;
use std::collections::HashSet;
use thiserror::Error;

pub const MAX_BATCH_SIZE: usize = 10;
pub const MAX_IMAGE_BYTES: usize = 10_000_000;
const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// One image from a multipart upload, fully buffered. Holding the bytes
/// means validation and ingestion hash and store the identical payload.
#[derive(Clone, Debug)]
pub struct UploadCandidate {
    /// Client-supplied filename; only the extension is used downstream.
    pub file_name: String,
    /// Declared MIME type of the part.
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Images are required.")]
    EmptyBatch,
    #[error("Cannot upload more than 10 images.")]
    BatchTooLarge,
    #[error("Image must be a JPEG or PNG.")]
    UnsupportedType,
    #[error("Image filename is invalid.")]
    InvalidFileName,
    #[error("Image size must be less than 10MB.")]
    ImageTooLarge,
    #[error("Images must be unique.")]
    DuplicateInBatch,
}

/// Validate a batch of candidate images before any persistence.
pub fn validate_batch(images: &[UploadCandidate]) -> Result<(), ValidationError> {
    if images.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    if images.len() > MAX_BATCH_SIZE {
        return Err(ValidationError::BatchTooLarge);
    }

    if images
        .iter()
        .any(|image| !ALLOWED_CONTENT_TYPES.contains(&image.content_type.as_str()))
    {
        return Err(ValidationError::UnsupportedType);
    }

    // The extension becomes part of the storage key; path separators in
    // it would only fail later, at the object store, after the metadata
    // row is already committed.
    if images
        .iter()
        .any(|image| hashing::extension(&image.file_name).contains(['/', '\\']))
    {
        return Err(ValidationError::InvalidFileName);
    }

    if images
        .iter()
        .any(|image| image.bytes.len() > MAX_IMAGE_BYTES)
    {
        return Err(ValidationError::ImageTooLarge);
    }

    let mut seen = HashSet::new();
    for image in images {
        if !seen.insert(hashing::content_digest(&image.bytes)) {
            return Err(ValidationError::DuplicateInBatch);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(bytes: &'static [u8]) -> UploadCandidate {
        UploadCandidate {
            file_name: "poster.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(validate_batch(&[]), Err(ValidationError::EmptyBatch));
    }

    #[test]
    fn eleven_images_are_rejected() {
        let batch: Vec<_> = (0..11).map(|_| jpeg(b"x")).collect();
        assert_eq!(validate_batch(&batch), Err(ValidationError::BatchTooLarge));
    }

    #[test]
    fn ten_distinct_images_pass() {
        let payloads: [&'static [u8]; 10] = [
            b"0", b"1", b"2", b"3", b"4", b"5", b"6", b"7", b"8", b"9",
        ];
        let batch: Vec<_> = payloads.into_iter().map(jpeg).collect();
        assert_eq!(validate_batch(&batch), Ok(()));
    }

    #[test]
    fn gif_is_rejected() {
        let mut candidate = jpeg(b"gif-bytes");
        candidate.content_type = "image/gif".into();
        assert_eq!(
            validate_batch(&[candidate]),
            Err(ValidationError::UnsupportedType)
        );
    }

    #[test]
    fn oversized_image_is_rejected() {
        let candidate = UploadCandidate {
            file_name: "big.png".into(),
            content_type: "image/png".into(),
            bytes: Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]),
        };
        assert_eq!(
            validate_batch(&[candidate]),
            Err(ValidationError::ImageTooLarge)
        );
    }

    #[test]
    fn separator_in_derived_extension_is_rejected() {
        // A dotless name is its own extension, so a slash in it would
        // reach the object store as part of the key.
        let mut candidate = jpeg(b"x");
        candidate.file_name = "dir/name".into();
        assert_eq!(
            validate_batch(&[candidate]),
            Err(ValidationError::InvalidFileName)
        );

        let mut candidate = jpeg(b"x");
        candidate.file_name = "dir\\name".into();
        assert_eq!(
            validate_batch(&[candidate]),
            Err(ValidationError::InvalidFileName)
        );
    }

    #[test]
    fn separator_before_last_dot_is_fine() {
        // Only the extension lands in the storage key.
        let mut candidate = jpeg(b"x");
        candidate.file_name = "dir/name.jpg".into();
        assert_eq!(validate_batch(&[candidate]), Ok(()));
    }

    #[test]
    fn duplicate_bytes_in_batch_are_rejected() {
        assert_eq!(
            validate_batch(&[jpeg(b"same"), jpeg(b"same")]),
            Err(ValidationError::DuplicateInBatch)
        );
    }

    #[test]
    fn type_check_runs_before_size_check() {
        // An image that violates both rules reports the MIME violation.
        let candidate = UploadCandidate {
            file_name: "big.gif".into(),
            content_type: "image/gif".into(),
            bytes: Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]),
        };
        assert_eq!(
            validate_batch(&[candidate]),
            Err(ValidationError::UnsupportedType)
        );
    }
}

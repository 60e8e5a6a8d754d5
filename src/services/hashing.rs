//! Content hashing and filename derivation.
//!
//! The stored filename is `{base64(sha256(bytes)) with '/' -> '_'}.{ext}`.
//! The hash makes the key content-addressable; the slash replacement keeps
//! it safe to use as a storage key. The extension is whatever follows the
//! last `.` of the client-supplied name, case as supplied, so identical
//! bytes uploaded under different extensions are distinct stored objects.

use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Base64-encoded SHA-256 digest of `bytes`. Used as the intra-batch
/// dedup key; not yet key-safe (may contain `/`).
pub fn content_digest(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(Sha256::digest(bytes))
}

/// Extension of a client-supplied filename: whatever follows the last
/// `.`, or the whole name when there is no dot.
pub fn extension(original_name: &str) -> &str {
    original_name.rsplit('.').next().unwrap_or(original_name)
}

/// Derive the stored filename for an uploaded image.
pub fn storage_filename(original_name: &str, bytes: &[u8]) -> String {
    let hash = content_digest(bytes).replace('/', "_");
    format!("{hash}.{}", extension(original_name))
}

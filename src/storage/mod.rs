//! Object-store seam: the trait the ingestion pipeline talks to, plus the
//! filesystem-backed implementation.

pub mod fs_object_store;
pub mod object_store;

pub use fs_object_store::FsObjectStore;
pub use object_store::{ObjectReader, ObjectStore, ObjectStoreError, ObjectStoreResult};

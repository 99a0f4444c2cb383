//! Vodworks Storage Library
//!
//! Storage abstraction and backends for the conversion service. The Azure
//! Blob backend is the production target; the local filesystem backend
//! serves development and tests.
//!
//! # Storage key format
//!
//! Keys are composed by the artifact publisher as
//! `{blob_prefix}/{relative_path}` with forward-slash separators. Backends
//! treat keys as opaque except for path-traversal validation in the local
//! backend.

#[cfg(feature = "storage-azure")]
pub mod azure;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureBlobStorage;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vodworks_core::StorageBackend;

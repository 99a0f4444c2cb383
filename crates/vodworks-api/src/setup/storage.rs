//! Storage backend initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use vodworks_core::Config;
use vodworks_storage::{create_storage, Storage};

/// Create the storage client selected by configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    Ok(storage)
}

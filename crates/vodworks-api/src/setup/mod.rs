//! Application setup and initialization
//!
//! All startup logic lives here so `main.rs` stays a thin shell and tests
//! can assemble the application from parts.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::artifact_store_impl::StorageArtifactStore;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use vodworks_core::Config;
use vodworks_processing::{ConversionPipeline, Transcoder};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    // Setup storage
    let storage = storage::setup_storage(&config).await?;

    // Assemble the conversion pipeline around the injected storage client
    let state = build_state(config.clone(), storage);

    // Setup routes
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}

/// Build application state from configuration and a storage client.
pub fn build_state(
    config: Config,
    storage: Arc<dyn vodworks_storage::Storage>,
) -> Arc<AppState> {
    let timeout = (config.transcode_timeout_secs > 0)
        .then(|| Duration::from_secs(config.transcode_timeout_secs));

    let transcoder = Transcoder::new(
        config.ffmpeg_path.clone(),
        config.hls_segment_duration,
        timeout,
    );
    let artifact_store = Arc::new(StorageArtifactStore::new(storage.clone()));
    let pipeline = ConversionPipeline::new(transcoder, artifact_store);

    Arc::new(AppState {
        config,
        storage,
        pipeline,
    })
}

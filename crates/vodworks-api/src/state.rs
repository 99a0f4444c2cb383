//! Application state shared across handlers.
//!
//! The storage client is constructed once at startup and injected here so
//! no handler reaches for ambient global state.

use std::sync::Arc;

use vodworks_core::Config;
use vodworks_processing::ConversionPipeline;
use vodworks_storage::Storage;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub pipeline: ConversionPipeline,
}

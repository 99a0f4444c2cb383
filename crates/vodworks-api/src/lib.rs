//! Vodworks API Library
//!
//! This crate provides the HTTP handlers and application setup for the
//! conversion service.

// Module declarations
mod api_doc;
mod artifact_store_impl;
mod telemetry;

// Public modules
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use state::AppState;

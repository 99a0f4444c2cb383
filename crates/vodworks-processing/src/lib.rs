//! Vodworks Processing Library
//!
//! Conversion pipeline for the vodworks service: per-request workspace
//! management, ffmpeg invocation for the fixed two-variant HLS ladder, and
//! artifact publication to a remote store.

pub mod pipeline;
pub mod publish;
pub mod transcode;
pub mod workspace;

// Re-export commonly used types
pub use pipeline::{ConversionError, ConversionPipeline};
pub use publish::{ArtifactPublisher, ArtifactStore, PublishResult};
pub use transcode::{TranscodeError, Transcoder, VariantSpec, VARIANTS};
pub use workspace::Workspace;

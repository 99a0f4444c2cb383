//! Conversion pipeline: transcode the staged input, then publish the
//! output tree to the remote store.
//!
//! The request handler owns the workspace lifecycle; this pipeline runs
//! the two middle stages and distinguishes their failures so the API layer
//! can map each to its error class.

use std::sync::Arc;

use crate::publish::{ArtifactPublisher, ArtifactStore, PublishResult};
use crate::transcode::{TranscodeError, Transcoder};
use crate::workspace::Workspace;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("transcode failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("publish failed: {0}")]
    Publish(#[source] anyhow::Error),
}

/// Runs one conversion end-to-end inside a caller-owned workspace.
pub struct ConversionPipeline {
    transcoder: Transcoder,
    publisher: ArtifactPublisher,
}

impl ConversionPipeline {
    pub fn new(transcoder: Transcoder, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            transcoder,
            publisher: ArtifactPublisher::new(store),
        }
    }

    /// Transcode the workspace input and publish every produced artifact
    /// under `blob_prefix`.
    pub async fn run(
        &self,
        workspace: &Workspace,
        blob_prefix: &str,
    ) -> Result<PublishResult, ConversionError> {
        self.transcoder
            .run(workspace.input_path(), workspace.output_dir())
            .await?;

        let result = self
            .publisher
            .publish(workspace.output_dir(), blob_prefix)
            .await
            .map_err(ConversionError::Publish)?;

        Ok(result)
    }
}

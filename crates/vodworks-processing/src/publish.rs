//! Artifact publication: walk the encoder output tree and upload every
//! file to the remote store under the caller's blob path prefix.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use vodworks_core::constants::{
    CONTENT_TYPE_BINARY, CONTENT_TYPE_HLS_PLAYLIST, CONTENT_TYPE_MPEG_TS, MASTER_PLAYLIST,
};

/// Storage operations the publisher needs (upload HLS artifacts).
///
/// The API crate implements this over its configured storage backend so the
/// pipeline stays decoupled from provider details.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload file bytes to a key with content type, overwriting any
    /// existing object. Returns the public URL.
    async fn upload_file(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<String>;

    /// Deterministic public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Outcome of a fully successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishResult {
    /// Public URL of the master playlist.
    pub master_url: String,
    /// Keys uploaded, in traversal order.
    pub files: Vec<String>,
}

/// Classify an artifact's content type by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("m3u8") => CONTENT_TYPE_HLS_PLAYLIST,
        Some("ts") => CONTENT_TYPE_MPEG_TS,
        _ => CONTENT_TYPE_BINARY,
    }
}

/// Compose a storage key as `{prefix}/{relative}` with forward-slash
/// separators regardless of the host filesystem convention.
pub fn blob_key(prefix: &str, relative: &Path) -> String {
    let mut key = prefix.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            key.push('/');
            key.push_str(&part.to_string_lossy());
        }
    }
    key
}

/// Uploads every regular file under an output tree to the remote store.
///
/// A single failed upload aborts the publish; files uploaded before the
/// failure stay in the store (no rollback). Re-publishing the same tree to
/// the same prefix overwrites object by object.
pub struct ArtifactPublisher {
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Publish all files under `output_dir` beneath `prefix` and return
    /// the master playlist URL plus the uploaded keys.
    pub async fn publish(&self, output_dir: &Path, prefix: &str) -> Result<PublishResult> {
        let mut uploaded = Vec::new();
        let mut pending: Vec<PathBuf> = vec![output_dir.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .with_context(|| format!("Failed to read output directory {}", dir.display()))?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }

                let relative = path
                    .strip_prefix(output_dir)
                    .with_context(|| format!("Artifact {} outside output tree", path.display()))?;
                let key = blob_key(prefix, relative);
                let content_type = content_type_for(&path);

                let data = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("Failed to read artifact {}", path.display()))?;

                tracing::debug!(key = %key, content_type, "Uploading artifact");
                self.store
                    .upload_file(&key, data, content_type)
                    .await
                    .with_context(|| format!("Failed to upload {}", key))?;

                uploaded.push(key);
            }
        }

        let master_key = blob_key(prefix, Path::new(MASTER_PLAYLIST));
        let master_url = self.store.public_url(&master_key);

        tracing::info!(
            file_count = uploaded.len(),
            master_url = %master_url,
            "Publish complete"
        );

        Ok(PublishResult {
            master_url,
            files: uploaded,
        })
    }
}

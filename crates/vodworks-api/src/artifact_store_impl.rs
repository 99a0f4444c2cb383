//! ArtifactStore implementation over the unified Storage trait.

use async_trait::async_trait;
use std::sync::Arc;

use vodworks_processing::ArtifactStore;
use vodworks_storage::Storage;

/// ArtifactStore that uses the Storage trait (works with both the Azure
/// and local backends).
#[derive(Clone)]
pub struct StorageArtifactStore {
    storage: Arc<dyn Storage>,
}

impl StorageArtifactStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ArtifactStore for StorageArtifactStore {
    async fn upload_file(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<String> {
        self.storage
            .upload_with_key(key, data, content_type)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    fn public_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }
}

#[cfg(feature = "storage-azure")]
use crate::AzureBlobStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use vodworks_core::Config;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-azure")]
        StorageBackend::Azure => {
            let azure = config
                .azure_config()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;

            let storage = AzureBlobStorage::new(&azure, config.azure_container.clone())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-azure"))]
        StorageBackend::Azure => Err(StorageError::ConfigError(
            "Azure storage backend not available (storage-azure feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

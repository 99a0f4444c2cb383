use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::sync::Arc;
use vodworks_core::{AzureConfig, StorageBackend};

/// Azure Blob Storage implementation
#[derive(Clone)]
pub struct AzureBlobStorage {
    store: Arc<MicrosoftAzure>,
    account: String,
    container: String,
    endpoint_suffix: String,
}

impl AzureBlobStorage {
    /// Create a new AzureBlobStorage instance
    ///
    /// # Arguments
    /// * `config` - Account credential parsed from the connection string
    /// * `container` - Blob container name
    pub fn new(config: &AzureConfig, container: String) -> StorageResult<Self> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(config.account.clone())
            .with_access_key(config.access_key.clone())
            .with_container_name(container.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(AzureBlobStorage {
            store: Arc::new(store),
            account: config.account.clone(),
            container,
            endpoint_suffix: config.endpoint_suffix.clone(),
        })
    }

    /// Generate the public URL for a blob
    ///
    /// Uses the standard Azure format:
    /// `https://{account}.blob.{endpoint_suffix}/{container}/{key}`
    fn generate_url(&self, key: &str) -> String {
        format!(
            "https://{}.blob.{}/{}/{}",
            self.account, self.endpoint_suffix, self.container, key
        )
    }
}

#[async_trait]
impl Storage for AzureBlobStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(bytes), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %self.container,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Blob upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            container = %self.container,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob upload successful"
        );

        Ok(url)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %self.container,
                key = %storage_key,
                "Blob delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }
}

//! Configuration validation
//!
//! Validates critical configuration values at startup to catch
//! misconfigurations early, before the first request arrives.

use anyhow::Result;
use vodworks_core::{Config, StorageBackend};

/// Validate critical configuration values
///
/// Fails fast on anything that would otherwise only surface mid-request:
/// a missing or malformed store credential, an unusable encoder path, or
/// zeroed limits.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.cors_origins.iter().any(|origin| origin == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    match config.storage_backend {
        StorageBackend::Azure => {
            // Parse eagerly: a missing or malformed credential is fatal at
            // startup, not on the first upload
            config.azure_config()?;
        }
        StorageBackend::Local => {
            if config.local_storage_path.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_PATH required with the local storage backend"
                ));
            }
            if config.local_storage_base_url.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_BASE_URL required with the local storage backend"
                ));
            }
        }
    }

    if config.ffmpeg_path.trim().is_empty() {
        return Err(anyhow::anyhow!("FFMPEG_PATH cannot be empty"));
    }

    if config.hls_segment_duration == 0 {
        return Err(anyhow::anyhow!("HLS segment duration cannot be 0"));
    }

    if config.max_upload_size_bytes == 0 {
        return Err(anyhow::anyhow!("Max upload size cannot be 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 5000,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            storage_backend: StorageBackend::Local,
            azure_connection_string: None,
            azure_container: "media".to_string(),
            local_storage_path: Some("/tmp/vodworks".to_string()),
            local_storage_base_url: Some("http://localhost:5000/media".to_string()),
            ffmpeg_path: "/usr/bin/ffmpeg".to_string(),
            hls_segment_duration: 10,
            transcode_timeout_secs: 0,
            max_upload_size_bytes: 2 * 1024 * 1024 * 1024,
        }
    }

    #[test]
    fn test_valid_local_config_passes() {
        validate_config(&base_config()).unwrap();
    }

    #[test]
    fn test_azure_backend_requires_connection_string() {
        let mut config = base_config();
        config.storage_backend = StorageBackend::Azure;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("AZURE_CONNECTION_STRING"));
    }

    #[test]
    fn test_azure_backend_with_credential_passes() {
        let mut config = base_config();
        config.storage_backend = StorageBackend::Azure;
        config.azure_connection_string =
            Some("AccountName=animecdn;AccountKey=a2V5".to_string());
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_local_backend_requires_path() {
        let mut config = base_config();
        config.local_storage_path = None;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(validate_config(&config).is_err());

        config.cors_origins = vec!["https://catalog.example".to_string()];
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_zero_segment_duration_rejected() {
        let mut config = base_config();
        config.hls_segment_duration = 0;
        assert!(validate_config(&config).is_err());
    }
}

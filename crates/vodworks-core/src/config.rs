//! Configuration module
//!
//! Environment-sourced configuration for the conversion service. The Azure
//! connection string is parsed eagerly so a malformed credential fails at
//! startup rather than on the first upload.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_CONTAINER: &str = "media";
const DEFAULT_FFMPEG_PATH: &str = "/usr/bin/ffmpeg";
const DEFAULT_HLS_SEGMENT_DURATION: u64 = 10;
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 2 * 1024 * 1024 * 1024;
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Parsed Azure storage credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AzureConfig {
    pub account: String,
    pub access_key: String,
    pub endpoint_suffix: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub azure_connection_string: Option<String>,
    pub azure_container: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Transcoding configuration
    pub ffmpeg_path: String,
    pub hls_segment_duration: u64,
    /// Seconds before an in-flight transcode is killed. 0 = unbounded.
    pub transcode_timeout_secs: u64,
    // Upload configuration
    pub max_upload_size_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::from_str(&value)?,
            Err(_) => StorageBackend::Azure,
        };

        Ok(Config {
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            storage_backend,
            azure_connection_string: env::var("AZURE_CONNECTION_STRING").ok(),
            azure_container: env::var("AZURE_CONTAINER_NAME")
                .unwrap_or_else(|_| DEFAULT_CONTAINER.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            ffmpeg_path: env::var("FFMPEG_PATH")
                .unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            hls_segment_duration: parse_env("HLS_SEGMENT_DURATION", DEFAULT_HLS_SEGMENT_DURATION)?,
            transcode_timeout_secs: parse_env("TRANSCODE_TIMEOUT_SECS", 0)?,
            max_upload_size_bytes: parse_env(
                "MAX_UPLOAD_SIZE_BYTES",
                DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            )?,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Parse the configured Azure connection string.
    ///
    /// Returns an error when the Azure backend is selected without a
    /// connection string, or when the string is malformed.
    pub fn azure_config(&self) -> Result<AzureConfig, anyhow::Error> {
        let raw = self
            .azure_connection_string
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("AZURE_CONNECTION_STRING not configured"))?;
        parse_connection_string(raw)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

/// Parse an Azure storage connection string of the form
/// `AccountName=...;AccountKey=...;EndpointSuffix=...`.
///
/// `DefaultEndpointsProtocol` and unknown segments are ignored. The
/// endpoint suffix defaults to the public Azure cloud.
pub fn parse_connection_string(raw: &str) -> Result<AzureConfig, anyhow::Error> {
    let mut account = None;
    let mut access_key = None;
    let mut endpoint_suffix = None;

    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            return Err(anyhow::anyhow!(
                "Malformed connection string segment: {}",
                segment
            ));
        };
        match key {
            "AccountName" => account = Some(value.to_string()),
            // Account keys are base64 and may themselves contain '='
            "AccountKey" => access_key = Some(value.to_string()),
            "EndpointSuffix" => endpoint_suffix = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(AzureConfig {
        account: account
            .ok_or_else(|| anyhow::anyhow!("Connection string missing AccountName"))?,
        access_key: access_key
            .ok_or_else(|| anyhow::anyhow!("Connection string missing AccountKey"))?,
        endpoint_suffix: endpoint_suffix
            .unwrap_or_else(|| DEFAULT_ENDPOINT_SUFFIX.to_string()),
    })
}

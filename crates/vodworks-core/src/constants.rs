//! Shared constants for the conversion service.

/// Service identifier reported by the health endpoint.
pub const SERVICE_NAME: &str = "ffmpeg-api";

/// Fallback blob path prefix used when the caller supplies none.
pub const DEFAULT_BLOB_PREFIX: &str = "videos";

/// File name of the master playlist produced by the encoder.
pub const MASTER_PLAYLIST: &str = "master.m3u8";

/// Content type for HLS playlists (.m3u8).
pub const CONTENT_TYPE_HLS_PLAYLIST: &str = "application/x-mpegURL";

/// Content type for MPEG transport stream segments (.ts).
pub const CONTENT_TYPE_MPEG_TS: &str = "video/MP2T";

/// Content type for anything the classifier does not recognize.
pub const CONTENT_TYPE_BINARY: &str = "application/octet-stream";

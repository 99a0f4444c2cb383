//! Test helpers: build AppState and router for integration tests.
//!
//! Run with: `cargo test -p vodworks-api`. Tests use the local storage
//! backend rooted in a temp directory and a shell script standing in for
//! ffmpeg, so neither Azure credentials nor a real encoder is needed.

use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use vodworks_core::{Config, StorageBackend};
use vodworks_storage::{LocalStorage, Storage};

/// Which encoder stand-in a test wants.
pub enum EncoderFixture {
    /// Fabricates the canonical 7-file two-variant output tree and exits 0.
    Success,
    /// Writes a diagnostic to stderr and exits non-zero.
    Failure,
}

/// Test application: server plus owned fixture directories.
pub struct TestApp {
    pub server: TestServer,
    pub storage_root: PathBuf,
    _storage_dir: TempDir,
    _fixtures_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Check whether a storage key was persisted by the local backend.
    pub fn stored(&self, key: &str) -> bool {
        self.storage_root.join(key).is_file()
    }
}

/// Setup a test app with isolated local storage and the chosen encoder.
pub async fn setup_test_app(encoder: EncoderFixture) -> TestApp {
    let fixtures_dir = tempfile::tempdir().expect("Failed to create fixtures directory");
    let encoder_path = match encoder {
        EncoderFixture::Success => write_fake_encoder(fixtures_dir.path()),
        EncoderFixture::Failure => write_failing_encoder(fixtures_dir.path()),
    };

    let storage_dir = tempfile::tempdir().expect("Failed to create storage directory");
    let storage_root = storage_dir.path().to_path_buf();

    let config = test_config(&storage_root, &encoder_path);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            storage_root.clone(),
            "http://localhost:5000/media".to_string(),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let state = vodworks_api::setup::build_state(config.clone(), storage);
    let router = vodworks_api::setup::routes::setup_routes(&config, state)
        .await
        .expect("Failed to build router");

    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        storage_root,
        _storage_dir: storage_dir,
        _fixtures_dir: fixtures_dir,
    }
}

fn test_config(storage_root: &Path, encoder_path: &Path) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        storage_backend: StorageBackend::Local,
        azure_connection_string: None,
        azure_container: "media".to_string(),
        local_storage_path: Some(storage_root.to_string_lossy().to_string()),
        local_storage_base_url: Some("http://localhost:5000/media".to_string()),
        ffmpeg_path: encoder_path.to_string_lossy().to_string(),
        hls_segment_duration: 10,
        transcode_timeout_secs: 0,
        max_upload_size_bytes: 64 * 1024 * 1024,
    }
}

/// Encoder stand-in: derives the output directory from its final argument
/// (`<out>/v%v/index.m3u8`) and fabricates the 7-file two-variant tree the
/// real encoder would produce.
fn write_fake_encoder(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-ffmpeg.sh",
        concat!(
            "#!/bin/sh\n",
            "for last; do :; done\n",
            "out=$(dirname \"$(dirname \"$last\")\")\n",
            "mkdir -p \"$out/v0\" \"$out/v1\"\n",
            "printf '#EXTM3U\\n' > \"$out/master.m3u8\"\n",
            "printf '#EXTM3U\\n' > \"$out/v0/index.m3u8\"\n",
            "printf '#EXTM3U\\n' > \"$out/v1/index.m3u8\"\n",
            "printf 'seg' > \"$out/v0/seg_000.ts\"\n",
            "printf 'seg' > \"$out/v0/seg_001.ts\"\n",
            "printf 'seg' > \"$out/v1/seg_000.ts\"\n",
            "printf 'seg' > \"$out/v1/seg_001.ts\"\n",
        ),
    )
}

fn write_failing_encoder(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "failing-ffmpeg.sh",
        "#!/bin/sh\necho 'input.mp4: Invalid data found when processing input' >&2\nexit 1\n",
    )
}

fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write encoder script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark encoder script executable");
    path
}

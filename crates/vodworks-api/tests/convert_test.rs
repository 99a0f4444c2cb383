//! Conversion API integration tests.
//!
//! Run with: `cargo test -p vodworks-api --test convert_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{setup_test_app, EncoderFixture};
use serde_json::Value;

fn video_part() -> Part {
    Part::bytes(b"not actually mpeg4, the fake encoder never reads it".to_vec())
        .file_name("episode1.mp4")
        .mime_type("video/mp4")
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(EncoderFixture::Success).await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body, serde_json::json!({"status": "ok", "service": "ffmpeg-api"}));
}

#[tokio::test]
async fn test_convert_without_video_field() {
    let app = setup_test_app(EncoderFixture::Success).await;

    let form = MultipartForm::new().add_text("blob_path", "anime/naruto/ep1");
    let response = app.client().post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body, serde_json::json!({"error": "No video file uploaded"}));
}

#[tokio::test]
async fn test_convert_with_empty_filename() {
    let app = setup_test_app(EncoderFixture::Success).await;

    let form = MultipartForm::new()
        .add_part("video", Part::bytes(b"payload".to_vec()).file_name(""));
    let response = app.client().post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body, serde_json::json!({"error": "Empty filename"}));
}

#[tokio::test]
async fn test_convert_success() {
    let app = setup_test_app(EncoderFixture::Success).await;

    let form = MultipartForm::new()
        .add_part("video", video_part())
        .add_text("blob_path", "anime/naruto/ep1");
    let response = app.client().post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["files_uploaded"], 7);
    assert_eq!(
        body["master_url"],
        "http://localhost:5000/media/anime/naruto/ep1/master.m3u8"
    );

    // every artifact landed under the caller's prefix
    for key in [
        "anime/naruto/ep1/master.m3u8",
        "anime/naruto/ep1/v0/index.m3u8",
        "anime/naruto/ep1/v0/seg_000.ts",
        "anime/naruto/ep1/v0/seg_001.ts",
        "anime/naruto/ep1/v1/index.m3u8",
        "anime/naruto/ep1/v1/seg_000.ts",
        "anime/naruto/ep1/v1/seg_001.ts",
    ] {
        assert!(app.stored(key), "missing key: {}", key);
    }
}

#[tokio::test]
async fn test_convert_defaults_blob_path() {
    let app = setup_test_app(EncoderFixture::Success).await;

    let form = MultipartForm::new().add_part("video", video_part());
    let response = app.client().post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(
        body["master_url"],
        "http://localhost:5000/media/videos/master.m3u8"
    );
    assert!(app.stored("videos/master.m3u8"));
}

#[tokio::test]
async fn test_convert_blank_blob_path_falls_back() {
    let app = setup_test_app(EncoderFixture::Success).await;

    let form = MultipartForm::new()
        .add_part("video", video_part())
        .add_text("blob_path", "  ");
    let response = app.client().post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert!(app.stored("videos/master.m3u8"));
}

#[tokio::test]
async fn test_convert_republish_overwrites() {
    let app = setup_test_app(EncoderFixture::Success).await;

    for _ in 0..2 {
        let form = MultipartForm::new()
            .add_part("video", video_part())
            .add_text("blob_path", "anime/naruto/ep1");
        let response = app.client().post("/convert").multipart(form).await;
        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        assert_eq!(body["files_uploaded"], 7);
    }
}

#[tokio::test]
async fn test_convert_encoder_failure() {
    let app = setup_test_app(EncoderFixture::Failure).await;

    let form = MultipartForm::new()
        .add_part("video", video_part())
        .add_text("blob_path", "anime/naruto/ep1");
    let response = app.client().post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    // the ffmpeg diagnostic stays server-side
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(!message.contains("Invalid data found"));

    // nothing was published
    assert!(!app.stored("anime/naruto/ep1/master.m3u8"));
}

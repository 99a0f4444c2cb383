//! FFmpeg invocation for the fixed two-variant HLS ladder.
//!
//! One encoder run produces both renditions: the source video stream is
//! split, each copy scaled and encoded at its target bitrate with a fixed
//! keyframe interval and scene-cut detection disabled so segment
//! boundaries stay GOP-aligned, and the source audio is muxed into each
//! variant. Output is segmented MPEG-TS, one subdirectory per variant,
//! with per-variant playlists and a master playlist.

use serde::Serialize;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// One rendition of the ladder.
#[derive(Debug, Clone, Serialize)]
pub struct VariantSpec {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub bitrate_kbps: u32,
}

/// The fixed ladder: 360p and 720p. Not user-configurable.
pub const VARIANTS: [VariantSpec; 2] = [
    VariantSpec {
        name: "360p",
        width: 640,
        height: 360,
        bitrate_kbps: 500,
    },
    VariantSpec {
        name: "720p",
        width: 1280,
        height: 720,
        bitrate_kbps: 1500,
    },
];

/// Keyframe interval in frames. Segment boundaries must fall on keyframes.
const GOP_FRAMES: u32 = 48;

const AUDIO_BITRATE: &str = "128k";
const AUDIO_SAMPLE_RATE: &str = "48000";

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("failed to spawn encoder at {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("encoder timed out after {0:?}")]
    TimedOut(Duration),

    #[error("encoder I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking-per-request ffmpeg invoker.
///
/// One invocation attempt per request, no retries. A non-zero exit carries
/// the captured stderr as the diagnostic. A zero exit is success; the
/// master playlist is not re-verified here.
pub struct Transcoder {
    ffmpeg_path: String,
    segment_duration: u64,
    timeout: Option<Duration>,
}

impl Transcoder {
    pub fn new(ffmpeg_path: String, segment_duration: u64, timeout: Option<Duration>) -> Self {
        Self {
            ffmpeg_path,
            segment_duration,
            timeout,
        }
    }

    /// Build the fixed argument template for one conversion.
    fn build_args(&self, input: &Path, output_dir: &Path) -> Vec<String> {
        let mut filter = String::from("[0:v]split=2[v1][v2]");
        for (i, variant) in VARIANTS.iter().enumerate() {
            filter.push_str(&format!(
                ";[v{idx}]scale=w={w}:h={h}[v{idx}out]",
                idx = i + 1,
                w = variant.width,
                h = variant.height
            ));
        }

        let mut args = vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-filter_complex".to_string(),
            filter,
        ];

        for (i, variant) in VARIANTS.iter().enumerate() {
            args.extend_from_slice(&[
                "-map".to_string(),
                format!("[v{}out]", i + 1),
                format!("-c:v:{}", i),
                "libx264".to_string(),
                format!("-b:v:{}", i),
                format!("{}k", variant.bitrate_kbps),
                "-preset".to_string(),
                "fast".to_string(),
                "-g".to_string(),
                GOP_FRAMES.to_string(),
                "-sc_threshold".to_string(),
                "0".to_string(),
            ]);
        }

        // Same source audio muxed into each variant
        for _ in &VARIANTS {
            args.extend_from_slice(&["-map".to_string(), "a:0".to_string()]);
        }
        args.extend_from_slice(&[
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            AUDIO_BITRATE.to_string(),
            "-ar".to_string(),
            AUDIO_SAMPLE_RATE.to_string(),
        ]);

        let var_stream_map = (0..VARIANTS.len())
            .map(|i| format!("v:{i},a:{i}"))
            .collect::<Vec<_>>()
            .join(" ");

        args.extend_from_slice(&[
            "-f".to_string(),
            "hls".to_string(),
            "-hls_time".to_string(),
            self.segment_duration.to_string(),
            "-hls_playlist_type".to_string(),
            "vod".to_string(),
            "-hls_segment_type".to_string(),
            "mpegts".to_string(),
            "-hls_segment_filename".to_string(),
            output_dir
                .join("v%v/seg_%03d.ts")
                .to_string_lossy()
                .to_string(),
            "-master_pl_name".to_string(),
            "master.m3u8".to_string(),
            "-var_stream_map".to_string(),
            var_stream_map,
            output_dir
                .join("v%v/index.m3u8")
                .to_string_lossy()
                .to_string(),
        ]);

        args
    }

    /// Run the encoder to completion on the staged input.
    #[tracing::instrument(skip(self, input, output_dir))]
    pub async fn run(&self, input: &Path, output_dir: &Path) -> Result<(), TranscodeError> {
        let args = self.build_args(input, output_dir);

        tracing::info!(
            encoder = %self.ffmpeg_path,
            input = %input.display(),
            "Starting HLS conversion"
        );
        tracing::debug!(args = %args.join(" "), "Encoder command");

        let child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TranscodeError::Spawn {
                path: self.ffmpeg_path.clone(),
                source: e,
            })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| TranscodeError::TimedOut(limit))??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(TranscodeError::Failed {
                status: output.status,
                stderr,
            });
        }

        tracing::info!("HLS conversion completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_for(out: &str) -> Vec<String> {
        let transcoder = Transcoder::new("/usr/bin/ffmpeg".to_string(), 10, None);
        transcoder.build_args(&PathBuf::from("/tmp/ws/input.mp4"), &PathBuf::from(out))
    }

    #[test]
    fn test_build_args_filter_graph() {
        let args = args_for("/tmp/ws/hls_output");
        let filter_pos = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert_eq!(
            args[filter_pos + 1],
            "[0:v]split=2[v1][v2];[v1]scale=w=640:h=360[v1out];[v2]scale=w=1280:h=720[v2out]"
        );
    }

    #[test]
    fn test_build_args_variant_encoding() {
        let joined = args_for("/tmp/ws/hls_output").join(" ");
        assert!(joined.contains("-c:v:0 libx264 -b:v:0 500k"));
        assert!(joined.contains("-c:v:1 libx264 -b:v:1 1500k"));
        assert!(joined.contains("-g 48 -sc_threshold 0"));
        assert!(joined.contains("-c:a aac -b:a 128k -ar 48000"));
    }

    #[test]
    fn test_build_args_hls_output() {
        let joined = args_for("/tmp/ws/hls_output").join(" ");
        assert!(joined.contains("-f hls -hls_time 10 -hls_playlist_type vod"));
        assert!(joined.contains("-hls_segment_filename /tmp/ws/hls_output/v%v/seg_%03d.ts"));
        assert!(joined.contains("-master_pl_name master.m3u8"));
        assert!(joined.contains("-var_stream_map v:0,a:0 v:1,a:1"));
        assert!(joined.ends_with("/tmp/ws/hls_output/v%v/index.m3u8"));
    }

    #[tokio::test]
    async fn test_missing_encoder_is_spawn_error() {
        let transcoder = Transcoder::new("/nonexistent/ffmpeg".to_string(), 10, None);
        let dir = tempfile::tempdir().unwrap();
        let err = transcoder
            .run(&dir.path().join("input.mp4"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_status() {
        // `false` exits 1 without reading its arguments
        let transcoder = Transcoder::new("false".to_string(), 10, None);
        let dir = tempfile::tempdir().unwrap();
        let err = transcoder
            .run(&dir.path().join("input.mp4"), dir.path())
            .await
            .unwrap_err();
        match err {
            TranscodeError::Failed { status, .. } => assert!(!status.success()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_exit_is_success_without_manifest() {
        // `true` exits 0 producing nothing; the invoker does not re-verify
        // the master playlist
        let transcoder = Transcoder::new("true".to_string(), 10, None);
        let dir = tempfile::tempdir().unwrap();
        transcoder
            .run(&dir.path().join("input.mp4"), dir.path())
            .await
            .unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_encoder() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow-encoder.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let transcoder = Transcoder::new(
            script.to_string_lossy().to_string(),
            10,
            Some(Duration::from_millis(50)),
        );
        let err = transcoder
            .run(&dir.path().join("input.mp4"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::TimedOut(_)));
    }
}

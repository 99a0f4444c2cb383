//! Per-request workspace management.
//!
//! Every conversion owns one isolated temporary directory tree holding the
//! staged input file and the encoder output subtree. Removal is tied to
//! ownership: dropping the workspace deletes the whole tree, so exactly one
//! release happens per acquisition on every code path.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the staged input file inside the workspace.
const INPUT_FILE: &str = "input.mp4";

/// Name of the encoder output subdirectory.
const OUTPUT_DIR: &str = "hls_output";

/// Isolated temporary directory tree owned by one in-flight conversion.
pub struct Workspace {
    root: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Workspace {
    /// Create a fresh uniquely-named workspace with an input slot and an
    /// empty output subdirectory.
    pub async fn create() -> Result<Self> {
        let root = TempDir::new().context("Failed to create workspace directory")?;
        let input = root.path().join(INPUT_FILE);
        let output = root.path().join(OUTPUT_DIR);

        tokio::fs::create_dir(&output)
            .await
            .context("Failed to create workspace output directory")?;

        tracing::debug!(path = %root.path().display(), "Workspace created");

        Ok(Workspace {
            root,
            input,
            output,
        })
    }

    /// Path of the staged input file. The file itself is written by the caller.
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Directory the encoder writes its output tree into.
    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    /// Root of the workspace tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Delete the workspace, surfacing removal errors.
    ///
    /// Dropping a workspace also deletes it (best effort); `close` is for
    /// the success path where a failed removal is worth reporting.
    pub fn close(self) -> std::io::Result<()> {
        self.root.close()
    }
}

//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::convert::ConvertRenderer;
use crate::adapters::recording::renderer::RecordingImageRenderer;
use crate::adapters::replaying::renderer::ReplayingImageRenderer;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::PlaceholderError;
use crate::ports::ImageRenderer;

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image renderer port.
    pub renderer: Box<dyn ImageRenderer>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the recorded cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<(PathBuf, usize), PlaceholderError> {
        let recorder = self
            .recorder
            .lock()
            .map_err(|e| PlaceholderError::Cassette(format!("Recorder lock poisoned: {e}")))?;
        let path = recorder
            .save()
            .map_err(|e| PlaceholderError::Cassette(format!("Failed to write cassette: {e}")))?;
        Ok((path.to_path_buf(), recorder.interaction_count()))
    }
}

impl ServiceContext {
    /// Create a live context that renders with the configured program.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        let renderer = ConvertRenderer::new(config.renderer_program(), config.renderer_timeout());
        Self { renderer: Box::new(renderer) }
    }

    /// Create a recording context that wraps the live renderer with a recorder.
    ///
    /// The cassette lands in `.placeholder/cassettes/<timestamp>/`.
    #[must_use]
    pub fn recording(config: &Config) -> (Self, RecordingSession) {
        Self::recording_in(config, Path::new(".placeholder/cassettes"))
    }

    /// Like [`ServiceContext::recording`], with cassettes under `root`.
    #[must_use]
    pub fn recording_in(config: &Config, root: &Path) -> (Self, RecordingSession) {
        let live_ctx = Self::live(config);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        let commit = get_commit_hash();
        let path = output_dir.join("renderer.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-renderer"),
            &commit,
        )));

        let recording = RecordingImageRenderer::new(live_ctx.renderer, Arc::clone(&recorder));

        let ctx = Self { renderer: Box::new(recording) };
        let session = RecordingSession { recorder };

        (ctx, session)
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, PlaceholderError> {
        let replayer = load_cassette(path)
            .map_err(|e| PlaceholderError::Cassette(format!("Failed to load cassette: {e}")))?;
        let replayer = Arc::new(Mutex::new(replayer));
        let renderer = Box::new(ReplayingImageRenderer::new(replayer));
        Ok(Self { renderer })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

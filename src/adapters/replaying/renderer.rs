//! Replaying adapter for the `ImageRenderer` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PlaceholderError;
use crate::ports::renderer::{ImageRenderer, PlaceholderRequest, RenderFuture, RenderedImage};

/// Serves recorded render results from a cassette.
pub struct ReplayingImageRenderer {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageRenderer {
    /// Create a replaying renderer backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageRenderer for ReplayingImageRenderer {
    fn render(&self, _request: &PlaceholderRequest) -> RenderFuture<'_> {
        let output = next_output(&self.replayer, "renderer", "render");
        Box::pin(async move {
            let output = output.map_err(PlaceholderError::Cassette)?;
            replay_result::<RenderedImage>(output).map_err(|e| PlaceholderError::Render {
                status: "replayed".into(),
                stderr: e.to_string(),
            })
        })
    }
}

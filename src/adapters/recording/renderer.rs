//! Recording adapter for the `ImageRenderer` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::renderer::{ImageRenderer, PlaceholderRequest, RenderFuture};

/// Records render interactions while delegating to an inner implementation.
pub struct RecordingImageRenderer {
    inner: Box<dyn ImageRenderer>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageRenderer {
    /// Creates a new recording renderer wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageRenderer>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageRenderer for RecordingImageRenderer {
    fn render(&self, request: &PlaceholderRequest) -> RenderFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.render(&request_clone).await;
            record_result(&recorder, "renderer", "render", &request_clone, &result);
            result
        })
    }
}

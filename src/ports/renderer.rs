//! Renderer port for the external image-drawing tool.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::PlaceholderError;
use crate::params::ImageFormat;

/// Label placement inside the image. Always centered.
pub const GRAVITY: &str = "center";

/// A fully validated placeholder request, scoped to one HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRequest {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels. `None` when the URL gave only a width.
    pub height: Option<u32>,
    /// Background color, 3 or 6 hex digits without `#`.
    pub background: String,
    /// Foreground (text) color, 3 or 6 hex digits without `#`.
    pub foreground: String,
    /// Output format.
    pub format: ImageFormat,
    /// Label text, already escaped for the renderer.
    pub label: String,
}

impl PlaceholderRequest {
    /// The `-size` argument: `WxH`, with a missing or zero axis left empty
    /// so the renderer sizes it from the label.
    #[must_use]
    pub fn size_arg(&self) -> String {
        let axis = |v: Option<u32>| v.filter(|n| *n != 0).map(|n| n.to_string()).unwrap_or_default();
        format!("{}x{}", axis(Some(self.width)), axis(self.height))
    }
}

/// Encoded image bytes produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedImage {
    /// Raw encoded bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Boxed future type returned by [`ImageRenderer::render`].
pub type RenderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RenderedImage, PlaceholderError>> + Send + 'a>>;

/// Draws placeholder images.
pub trait ImageRenderer: Send + Sync {
    /// Render the given request into encoded image bytes.
    fn render(&self, request: &PlaceholderRequest) -> RenderFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(width: u32, height: Option<u32>) -> PlaceholderRequest {
        PlaceholderRequest {
            width,
            height,
            background: "444".into(),
            foreground: "888".into(),
            format: ImageFormat::Png,
            label: "label".into(),
        }
    }

    #[test]
    fn size_arg_both_axes() {
        assert_eq!(request(300, Some(200)).size_arg(), "300x200");
    }

    #[test]
    fn size_arg_missing_height_is_empty() {
        assert_eq!(request(150, None).size_arg(), "150x");
    }

    #[test]
    fn size_arg_zero_means_auto() {
        assert_eq!(request(0, Some(50)).size_arg(), "x50");
        assert_eq!(request(0, Some(0)).size_arg(), "x");
    }

    #[test]
    fn request_serializes_format_lowercase() {
        let json = serde_json::to_value(request(10, None)).unwrap();
        assert_eq!(json["format"], "png");
        assert!(json["height"].is_null());
    }

    #[test]
    fn rendered_image_base64_round_trip() {
        let image = RenderedImage { data: vec![0x89, 0x50, 0x4E, 0x47] };
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, r#"{"data":"iVBORw=="}"#);
        let back: RenderedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}

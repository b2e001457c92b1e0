//! Live adapter that draws placeholders with ImageMagick `convert(1)`.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::PlaceholderError;
use crate::ports::renderer::{
    ImageRenderer, PlaceholderRequest, RenderFuture, RenderedImage, GRAVITY,
};

/// Renders by spawning `convert` and collecting the encoded image from stdout.
pub struct ConvertRenderer {
    program: String,
    timeout: Duration,
}

impl ConvertRenderer {
    /// Create a renderer that runs `program` with the given timeout.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self { program: program.into(), timeout }
    }
}

/// Arguments passed to `convert`, output written to stdout.
#[must_use]
pub fn convert_args(request: &PlaceholderRequest) -> Vec<String> {
    vec![
        "-size".into(),
        request.size_arg(),
        "-background".into(),
        format!("#{}", request.background),
        "-fill".into(),
        format!("#{}", request.foreground),
        "-gravity".into(),
        GRAVITY.into(),
        format!("label:{}", request.label),
        format!("{}:-", request.format.extension()),
    ]
}

impl ImageRenderer for ConvertRenderer {
    fn render(&self, request: &PlaceholderRequest) -> RenderFuture<'_> {
        let args = convert_args(request);
        Box::pin(async move {
            log::debug!("running command: {} {}", self.program, args.join(" "));

            let child = Command::new(&self.program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()?;

            // Dropping the pending future on timeout kills the child.
            let output = tokio::time::timeout(self.timeout, child.wait_with_output())
                .await
                .map_err(|_| PlaceholderError::Timeout(self.timeout.as_secs()))??;

            if !output.status.success() {
                return Err(PlaceholderError::Render {
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            Ok(RenderedImage { data: output.stdout })
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ImageFormat;

    fn request() -> PlaceholderRequest {
        PlaceholderRequest {
            width: 300,
            height: None,
            background: "ff0000".into(),
            foreground: "fff".into(),
            format: ImageFormat::Jpg,
            label: "50\\% off".into(),
        }
    }

    #[test]
    fn builds_convert_command_line() {
        assert_eq!(
            convert_args(&request()),
            [
                "-size",
                "300x",
                "-background",
                "#ff0000",
                "-fill",
                "#fff",
                "-gravity",
                "center",
                "label:50\\% off",
                "jpg:-",
            ]
        );
    }

    #[tokio::test]
    async fn missing_binary_is_an_error() {
        let renderer =
            ConvertRenderer::new("/nonexistent/placeholder-convert", Duration::from_secs(5));
        let err = renderer.render(&request()).await.unwrap_err();
        assert!(matches!(err, PlaceholderError::Io(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_a_render_error() {
        let renderer = ConvertRenderer::new("false", Duration::from_secs(5));
        let err = renderer.render(&request()).await.unwrap_err();
        assert!(matches!(err, PlaceholderError::Render { .. }), "{err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_becomes_image_data() {
        // `echo` prints its arguments, standing in for encoded bytes.
        let renderer = ConvertRenderer::new("echo", Duration::from_secs(5));
        let image = renderer.render(&request()).await.unwrap();
        let text = String::from_utf8(image.data).unwrap();
        assert!(text.starts_with("-size 300x -background #ff0000"), "{text}");
        assert!(text.trim_end().ends_with("jpg:-"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_renderer_times_out() {
        let script = test_support::sleeping_script("adapter");
        let renderer = ConvertRenderer::new(script.to_str().unwrap(), Duration::from_secs(1));

        let started = std::time::Instant::now();
        let err = renderer.render(&request()).await.unwrap_err();
        assert!(matches!(err, PlaceholderError::Timeout(1)), "{err}");
        assert!(started.elapsed() < Duration::from_secs(4));

        let _ = std::fs::remove_file(&script);
    }
}

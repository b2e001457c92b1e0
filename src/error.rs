//! Unified error type for placeholder.

use thiserror::Error;

/// Errors that can occur while interpreting or rendering a placeholder.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    /// The size spec matched but a dimension does not fit in a `u32`.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// The requested extension is not one of png, gif or jpg.
    #[error("Invalid extension: {0}")]
    InvalidExtension(String),

    /// A background or foreground color is not 3 or 6 hex digits.
    #[error("Invalid colors: {background}/{foreground}")]
    InvalidColor {
        /// Background color as requested.
        background: String,
        /// Foreground color as requested.
        foreground: String,
    },

    /// The rendering tool exited unsuccessfully.
    #[error("Renderer failed ({status}): {stderr}")]
    Render {
        /// Exit status description.
        status: String,
        /// Captured standard error of the tool.
        stderr: String,
    },

    /// The rendering tool did not finish in time.
    #[error("Renderer timed out after {0}s")]
    Timeout(u64),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Cassette recording or replay error.
    #[error("Cassette error: {0}")]
    Cassette(String),
}

impl PlaceholderError {
    /// Whether this error was caused by the request itself (HTTP 400).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimension(_) | Self::InvalidExtension(_) | Self::InvalidColor { .. }
        )
    }
}

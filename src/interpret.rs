//! Turns a request path into a placeholder request.
//!
//! Path layout: `<size>[/<background>[/<foreground>]]`, with the output
//! extension attached to whichever of those three segments carries the first
//! dot. Anything whose first segment does not start with digits is a page
//! view, not an image request.

use crate::error::PlaceholderError;
use crate::params::{
    default_label, escape_label, parse_size, validate_colors, ImageFormat, DEFAULT_BACKGROUND,
    DEFAULT_FOREGROUND,
};
use crate::ports::PlaceholderRequest;

/// Outcome of interpreting a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Serve the static home page.
    HomePage,
    /// Render this placeholder.
    Image(PlaceholderRequest),
}

/// Interpret a URL-decoded path (without the host) and the optional `text` query value.
///
/// # Errors
///
/// Returns a client error ([`PlaceholderError::is_client_error`]) for an
/// unsupported extension, an invalid color, or an oversized dimension.
pub fn interpret(path: &str, text: Option<&str>) -> Result<Interpretation, PlaceholderError> {
    if path.is_empty() {
        return Ok(Interpretation::HomePage);
    }

    let normalized = normalize_path(path);
    let mut segments = normalized.split('/');
    let mut size_spec = segments.next().unwrap_or_default();
    let mut background = segments.next().unwrap_or(DEFAULT_BACKGROUND);
    let mut foreground = segments.next().unwrap_or(DEFAULT_FOREGROUND);

    let Some(size) = parse_size(size_spec)? else {
        return Ok(Interpretation::HomePage);
    };

    // Only the first segment holding a dot supplies the extension.
    let mut extension = None;
    if let Some((value, ext)) = size_spec.split_once('.') {
        size_spec = value;
        extension = Some(ext);
    }
    if extension.is_none() {
        if let Some((value, ext)) = background.split_once('.') {
            background = value;
            extension = Some(ext);
        }
    }
    if extension.is_none() {
        if let Some((value, ext)) = foreground.split_once('.') {
            foreground = value;
            extension = Some(ext);
        }
    }
    log::trace!("size spec {size_spec:?} parsed as {size:?}");

    let format = match extension {
        Some(ext) => ImageFormat::from_extension(ext)?,
        None => ImageFormat::default(),
    };

    validate_colors(background, foreground)?;

    let label = match text {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => default_label(size),
    };

    Ok(Interpretation::Image(PlaceholderRequest {
        width: size.width,
        height: size.height,
        background: background.to_string(),
        foreground: foreground.to_string(),
        format,
        label: escape_label(&label),
    }))
}

/// Collapse runs of `/` and strip one leading `/`.
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if !last_was_slash {
                out.push(ch);
            }
            last_was_slash = true;
        } else {
            out.push(ch);
            last_was_slash = false;
        }
    }
    match out.strip_prefix('/') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

//! Field-level parsing for the URL segments of a placeholder request.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PlaceholderError;

/// Default background color.
pub const DEFAULT_BACKGROUND: &str = "444";

/// Default foreground color.
pub const DEFAULT_FOREGROUND: &str = "888";

/// Width, optionally followed by `x` and a height, anchored at the start only.
/// ASCII digits only; other scripts' digits make the path a page view.
static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(?:x([0-9]+))?").expect("size regex"));

/// 3 or 6 hex digits, full match.
static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{3}(?:[0-9a-fA-F]{3})?$").expect("color regex"));

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Portable Network Graphics.
    #[default]
    Png,
    /// Graphics Interchange Format.
    Gif,
    /// JPEG, requested with the `jpg` extension.
    Jpg,
}

impl ImageFormat {
    /// Parse a URL extension. Only the exact lowercase `png`, `gif` and `jpg` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceholderError::InvalidExtension`] for anything else.
    pub fn from_extension(ext: &str) -> Result<Self, PlaceholderError> {
        match ext {
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "jpg" => Ok(Self::Jpg),
            other => Err(PlaceholderError::InvalidExtension(other.to_string())),
        }
    }

    /// The extension, also used as the renderer's output coder name.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpg => "jpg",
        }
    }

    /// MIME type sent as `Content-Type`.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Jpg => "image/jpeg",
        }
    }
}

/// Dimensions parsed from a size spec. Height stays `None` when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels, if given.
    pub height: Option<u32>,
}

/// Parse the leading `W` or `WxH` of a size spec.
///
/// Returns `Ok(None)` when the segment does not start with digits, which
/// means the request is not an image request at all. Trailing text after the
/// match (such as `.png`) is ignored.
///
/// # Errors
///
/// Returns [`PlaceholderError::InvalidDimension`] if a dimension overflows `u32`.
pub fn parse_size(spec: &str) -> Result<Option<Size>, PlaceholderError> {
    let Some(caps) = SIZE_RE.captures(spec) else {
        return Ok(None);
    };

    let width = parse_dimension(&caps[1])?;
    let height = caps.get(2).map(|m| parse_dimension(m.as_str())).transpose()?;

    Ok(Some(Size { width, height }))
}

fn parse_dimension(digits: &str) -> Result<u32, PlaceholderError> {
    digits.parse().map_err(|_| PlaceholderError::InvalidDimension(digits.to_string()))
}

/// Whether `color` is exactly 3 or 6 hex digits, case-insensitive.
#[must_use]
pub fn is_valid_color(color: &str) -> bool {
    COLOR_RE.is_match(color)
}

/// Validate both colors together.
///
/// # Errors
///
/// Returns [`PlaceholderError::InvalidColor`] naming both values if either is invalid.
pub fn validate_colors(background: &str, foreground: &str) -> Result<(), PlaceholderError> {
    if is_valid_color(background) && is_valid_color(foreground) {
        Ok(())
    } else {
        Err(PlaceholderError::InvalidColor {
            background: background.to_string(),
            foreground: foreground.to_string(),
        })
    }
}

/// The label drawn when no `text` is given: `WxH`, or `WxW` without a height.
#[must_use]
pub fn default_label(size: Size) -> String {
    // A zero height also falls back to the width.
    let height = size.height.filter(|h| *h != 0).unwrap_or(size.width);
    format!("{}x{height}", size.width)
}

/// Escape text for the renderer's `label:` syntax.
///
/// Backslashes are doubled first, then each `%` gets a backslash, so the
/// inserted backslashes are never doubled themselves.
#[must_use]
pub fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('%', "\\%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_width_and_height() {
        let size = parse_size("300x200").unwrap().unwrap();
        assert_eq!(size, Size { width: 300, height: Some(200) });
    }

    #[test]
    fn size_width_only_leaves_height_unset() {
        let size = parse_size("150").unwrap().unwrap();
        assert_eq!(size.width, 150);
        assert_eq!(size.height, None);
    }

    #[test]
    fn size_ignores_trailing_text() {
        assert_eq!(
            parse_size("100x100.gif").unwrap(),
            Some(Size { width: 100, height: Some(100) })
        );
        assert_eq!(parse_size("64xabc").unwrap(), Some(Size { width: 64, height: None }));
    }

    #[test]
    fn size_non_numeric_is_not_a_size() {
        assert_eq!(parse_size("abc").unwrap(), None);
        assert_eq!(parse_size("").unwrap(), None);
        assert_eq!(parse_size("x100").unwrap(), None);
        assert_eq!(parse_size("favicon.ico").unwrap(), None);
    }

    #[test]
    fn size_non_ascii_digits_are_not_a_size() {
        assert_eq!(parse_size("\u{661}\u{660}\u{660}").unwrap(), None);
        assert_eq!(parse_size("\u{ff11}\u{ff10}").unwrap(), None);
        // A non-ASCII height is dropped like any other trailing text.
        assert_eq!(
            parse_size("10x\u{661}\u{660}").unwrap(),
            Some(Size { width: 10, height: None })
        );
    }

    #[test]
    fn size_overflow_is_rejected() {
        let err = parse_size("99999999999x10").unwrap_err();
        assert!(matches!(err, PlaceholderError::InvalidDimension(_)));
        assert!(parse_size("10x99999999999").is_err());
    }

    #[test]
    fn valid_colors() {
        for color in ["444", "888", "fff", "FFF", "aBc", "ff0000", "FFFFFF", "c0ffee"] {
            assert!(is_valid_color(color), "{color} should be valid");
        }
    }

    #[test]
    fn invalid_colors() {
        for color in ["", "zzz", "ff", "ffff", "fffff", "fffffff", "#fff", "ggg", "fff ", "12345g"] {
            assert!(!is_valid_color(color), "{color:?} should be invalid");
        }
    }

    #[test]
    fn validate_colors_reports_both() {
        assert!(validate_colors("444", "888").is_ok());
        let err = validate_colors("444", "nope").unwrap_err();
        assert_eq!(err.to_string(), "Invalid colors: 444/nope");
    }

    #[test]
    fn format_extensions() {
        assert_eq!(ImageFormat::from_extension("png").unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("gif").unwrap(), ImageFormat::Gif);
        assert_eq!(ImageFormat::from_extension("jpg").unwrap(), ImageFormat::Jpg);
    }

    #[test]
    fn format_rejects_unknown() {
        for ext in ["bmp", "jpeg", "PNG", "", "webp", "png.gif"] {
            assert!(ImageFormat::from_extension(ext).is_err(), "{ext:?} should be rejected");
        }
    }

    #[test]
    fn format_mime_types() {
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Gif.mime_type(), "image/gif");
        assert_eq!(ImageFormat::Jpg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
    }

    #[test]
    fn default_label_uses_width_for_missing_height() {
        assert_eq!(default_label(Size { width: 150, height: None }), "150x150");
        assert_eq!(default_label(Size { width: 300, height: Some(200) }), "300x200");
        assert_eq!(default_label(Size { width: 40, height: Some(0) }), "40x40");
    }

    #[test]
    fn escape_backslash_then_percent() {
        assert_eq!(escape_label("plain"), "plain");
        assert_eq!(escape_label("100%"), "100\\%");
        assert_eq!(escape_label("a\\b"), "a\\\\b");
        assert_eq!(escape_label("\\%"), "\\\\\\%");
    }
}

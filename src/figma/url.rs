//! Figma link parsing.
//!
//! Recognised link shapes:
//!
//! - `https://www.figma.com/board/<key>/...`
//! - `https://www.figma.com/design/<key>/...`
//! - `https://www.figma.com/file/<key>/...`

use std::sync::OnceLock;

use regex::Regex;

use super::error::{FigmaError, FigmaResult};

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"figma\.com/(?:board|design|file)/([^/?]+)")
            .expect("Figma URL pattern is a valid regex")
    })
}

/// Extracts the file key from a Figma URL.
///
/// The key is the path segment after `board/`, `design/` or `file/`, up to
/// the next `/` or `?`.
///
/// # Errors
///
/// Returns [`FigmaError::InvalidUrl`] if the URL matches none of the shapes.
pub fn parse_file_key(url: &str) -> FigmaResult<String> {
    key_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FigmaError::InvalidUrl {
            url: url.to_string(),
        })
}

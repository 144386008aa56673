//! Loads the localized typeface into a canvas.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::metrics::FontFaces;

pub const REGULAR_FILE: &str = "Roboto-Regular.ttf";
pub const BOLD_FILE: &str = "Roboto-Bold.ttf";

/// Where the two font files live: a local folder or an HTTP(S) base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Dir(PathBuf),
    Url(String),
}

impl FontSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            FontSource::Url(s.trim_end_matches('/').to_string())
        } else {
            FontSource::Dir(PathBuf::from(s))
        }
    }

    fn fetch(&self, file: &str) -> Result<Vec<u8>> {
        match self {
            FontSource::Dir(dir) => Ok(fs::read(dir.join(file))?),
            FontSource::Url(base) => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(10))
                    .build()?;
                let bytes = client
                    .get(format!("{}/{}", base, file))
                    .send()?
                    .error_for_status()?
                    .bytes()?;
                Ok(bytes.to_vec())
            }
        }
    }

    pub fn fetch_faces(&self) -> Result<FontFaces> {
        Ok(FontFaces {
            regular: self.fetch(REGULAR_FILE)?,
            bold: self.fetch(BOLD_FILE)?,
        })
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Dir(p) => write!(f, "{}", p.display()),
            FontSource::Url(u) => f.write_str(u),
        }
    }
}

/// Try to switch `canvas` to the localized font family.
///
/// Returns `false` and leaves the canvas on its built-in font when either
/// file is missing or unreadable. Never fails.
pub fn load_fonts<C: Canvas + ?Sized>(canvas: &mut C, source: &FontSource) -> bool {
    let outcome = source.fetch_faces().and_then(|faces| canvas.register_fonts(faces));
    match outcome {
        Ok(()) => {
            debug!(%source, "embedded font loaded");
            true
        }
        Err(e) => {
            warn!(%source, error = %e, "font unavailable, using built-in font with transliteration");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    #[test]
    fn source_kind_is_detected() {
        assert_eq!(
            FontSource::parse("https://cdn.example.com/fonts/"),
            FontSource::Url("https://cdn.example.com/fonts".into())
        );
        assert_eq!(FontSource::parse("/opt/fonts"), FontSource::Dir(PathBuf::from("/opt/fonts")));
    }

    #[test]
    fn missing_directory_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = RecordingCanvas::new();
        assert!(!load_fonts(&mut canvas, &FontSource::Dir(dir.path().join("nope"))));
        assert!(!canvas.metrics().is_embedded());
    }

    #[test]
    fn corrupt_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(REGULAR_FILE), b"junk").unwrap();
        fs::write(dir.path().join(BOLD_FILE), b"junk").unwrap();
        let mut canvas = RecordingCanvas::new();
        assert!(!load_fonts(&mut canvas, &FontSource::Dir(dir.path().to_path_buf())));
    }

    #[test]
    fn unreachable_url_falls_back() {
        let mut canvas = RecordingCanvas::new();
        assert!(!load_fonts(&mut canvas, &FontSource::Url("http://127.0.0.1:1".into())));
    }
}

//! Image references and decoding
//!
//! An [`ImageSource`] is anything the pipeline can turn into pixels: a file on
//! disk, raw encoded bytes, or a `data:` URI. Decoding goes through the `image`
//! crate; the decoded image is downsampled before sampling so that large
//! wallpapers cost the same as thumbnails.

use crate::core::error::{Result, ThemeError};
use base64::Engine;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

/// Longest edge (in pixels) of the buffer handed to the sampler
pub const MAX_SAMPLE_DIMENSION: u32 = 300;

/// A resolvable image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on the local filesystem
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG)
    Bytes(Vec<u8>),
    /// A `data:<mime>;base64,<payload>` URI
    DataUri(String),
}

impl ImageSource {
    /// Classify a textual reference
    ///
    /// `data:` URIs and `file://` URLs are recognized; anything without a
    /// scheme is treated as a path. Network URLs are rejected.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(ThemeError::UnsupportedSource(
                "empty image reference".to_string(),
            ));
        }

        if reference.starts_with("data:") {
            return Ok(ImageSource::DataUri(reference.to_string()));
        }

        if let Some(path) = reference.strip_prefix("file://") {
            return Ok(ImageSource::Path(PathBuf::from(path)));
        }

        let lower = reference.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Err(ThemeError::UnsupportedSource(format!(
                "network references are not fetched: {}",
                reference
            )));
        }

        Ok(ImageSource::Path(PathBuf::from(reference)))
    }

    /// Short, log-safe label for this source
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            ImageSource::DataUri(uri) => {
                let mime = uri
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split([';', ',']).next())
                    .filter(|m| !m.is_empty())
                    .unwrap_or("unknown");
                format!("<data URI {}, {} chars>", mime, uri.len())
            }
        }
    }

    /// Stable key used by the decoded-image cache
    ///
    /// Path keys carry the file's length and modification time, so a file
    /// rewritten in place gets a fresh key.
    pub fn cache_key(&self) -> String {
        match self {
            ImageSource::Path(path) => match fs::metadata(path) {
                Ok(meta) => {
                    let modified = meta
                        .modified()
                        .ok()
                        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                        .map(|since| since.as_nanos())
                        .unwrap_or(0);
                    format!("path:{}:{}:{}", path.display(), meta.len(), modified)
                }
                Err(_) => format!("path:{}", path.display()),
            },
            ImageSource::Bytes(bytes) => format!("bytes:{:016x}", content_hash(bytes)),
            ImageSource::DataUri(uri) => format!("data:{:016x}", content_hash(uri.as_bytes())),
        }
    }

    /// Decode the referenced image
    pub fn load(&self) -> Result<DynamicImage> {
        debug!("Loading image from {}", self.describe());

        let decoded = match self {
            ImageSource::Path(path) => image::open(path).map_err(|e| self.load_error(e)),
            ImageSource::Bytes(bytes) => {
                image::load_from_memory(bytes).map_err(|e| self.load_error(e))
            }
            ImageSource::DataUri(uri) => {
                let bytes = decode_data_uri(uri)?;
                image::load_from_memory(&bytes).map_err(|e| self.load_error(e))
            }
        }?;

        debug!(
            "Decoded {}x{} image from {}",
            decoded.width(),
            decoded.height(),
            self.describe()
        );
        Ok(decoded)
    }

    fn load_error(&self, err: impl std::fmt::Display) -> ThemeError {
        ThemeError::ImageLoad {
            source_label: self.describe(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// Extract the payload of a base64 `data:` URI
fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ThemeError::UnsupportedSource("not a data URI".to_string()))?;

    let (header, payload) = rest.split_once(',').ok_or_else(|| ThemeError::ImageLoad {
        source_label: "<data URI>".to_string(),
        message: "missing ',' separator".to_string(),
    })?;

    if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(ThemeError::UnsupportedSource(
            "data URI payload must be base64 encoded".to_string(),
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ThemeError::ImageLoad {
            source_label: "<data URI>".to_string(),
            message: format!("invalid base64 payload: {}", e),
        })
}

/// Downsample to fit within `max_dim` x `max_dim`, preserving aspect ratio
///
/// Images already within bounds are converted without resampling.
pub fn prepare_pixels(image: &DynamicImage, max_dim: u32) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ThemeError::PixelAccess(
            "decoded image has no pixels".to_string(),
        ));
    }

    let rgba = image.to_rgba8();
    let max_dim = max_dim.max(1);
    if width <= max_dim && height <= max_dim {
        return Ok(rgba);
    }

    let scale = (max_dim as f64 / width as f64).min(max_dim as f64 / height as f64);
    let new_w = ((width as f64 * scale).round() as u32).clamp(1, max_dim);
    let new_h = ((height as f64 * scale).round() as u32).clamp(1, max_dim);

    debug!(
        "Downsampling {}x{} -> {}x{} for sampling",
        width, height, new_w, new_h
    );
    Ok(imageops::resize(&rgba, new_w, new_h, FilterType::Triangle))
}


#[cfg(test)]
mod tests {
    use super::test_images::{encode_png, solid};
    use super::*;

    #[test]
    fn test_parse_references() {
        assert!(matches!(
            ImageSource::parse("wallpaper.png").unwrap(),
            ImageSource::Path(_)
        ));
        assert_eq!(
            ImageSource::parse("file:///tmp/a.jpg").unwrap(),
            ImageSource::Path(PathBuf::from("/tmp/a.jpg"))
        );
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA").unwrap(),
            ImageSource::DataUri(_)
        ));
        assert!(matches!(
            ImageSource::parse("https://example.com/a.png"),
            Err(ThemeError::UnsupportedSource(_))
        ));
        assert!(ImageSource::parse("   ").is_err());
    }

    #[test]
    fn test_load_from_bytes() {
        let png = encode_png(&solid(4, 3, [10, 200, 30, 255]));
        let image = ImageSource::Bytes(png).load().unwrap();
        assert_eq!(image.dimensions(), (4, 3));
    }

    #[test]
    fn test_load_from_data_uri() {
        let png = encode_png(&solid(2, 2, [255, 0, 0, 255]));
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        );
        let image = ImageSource::parse(&uri).unwrap().load().unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn test_data_uri_without_base64_is_rejected() {
        let err = ImageSource::DataUri("data:image/png,rawdata".into())
            .load()
            .unwrap_err();
        assert!(matches!(err, ThemeError::UnsupportedSource(_)));
    }

    #[test]
    fn test_garbage_bytes_fail_with_load_error() {
        let err = ImageSource::Bytes(vec![1, 2, 3, 4]).load().unwrap_err();
        assert!(matches!(err, ThemeError::ImageLoad { .. }));
    }

    #[test]
    fn test_missing_file_fails_with_load_error() {
        let err = ImageSource::Path(PathBuf::from("/definitely/not/here.png"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ThemeError::ImageLoad { .. }));
    }

    #[test]
    fn test_prepare_pixels_preserves_aspect_ratio() {
        let image = DynamicImage::ImageRgba8(solid(1200, 600, [0, 0, 255, 255]));
        let pixels = prepare_pixels(&image, MAX_SAMPLE_DIMENSION).unwrap();
        assert_eq!(pixels.dimensions(), (300, 150));
    }

    #[test]
    fn test_prepare_pixels_keeps_small_images() {
        let image = DynamicImage::ImageRgba8(solid(40, 20, [0, 0, 255, 255]));
        let pixels = prepare_pixels(&image, MAX_SAMPLE_DIMENSION).unwrap();
        assert_eq!(pixels.dimensions(), (40, 20));
    }

    #[test]
    fn test_cache_key_depends_on_content() {
        let a = ImageSource::Bytes(vec![1, 2, 3]);
        let b = ImageSource::Bytes(vec![1, 2, 4]);
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), a.clone().cache_key());
    }

    #[test]
    fn test_cache_key_tracks_rewritten_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallpaper.png");
        let source = ImageSource::Path(path.clone());
        let missing = source.cache_key();

        fs::write(&path, encode_png(&solid(4, 4, [255, 0, 0, 255]))).unwrap();
        let first = source.cache_key();
        assert_ne!(missing, first);
        assert_eq!(first, source.cache_key());

        fs::write(&path, encode_png(&solid(16, 16, [0, 0, 255, 255]))).unwrap();
        assert_ne!(first, source.cache_key());
    }
}

//! Error types for the theme pipeline
//!
//! Errors fall into three groups: input errors (the image could not be read or
//! decoded), empty-result errors (every sampled pixel was filtered out), and
//! computation errors (pixel access failed mid-pipeline). None of them are
//! retried internally.

use thiserror::Error;

/// Main error type for the theme pipeline
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The image reference could not be read or decoded
    #[error("Failed to load image '{source_label}': {message}")]
    ImageLoad {
        source_label: String,
        message: String,
    },

    /// The image reference uses a scheme this crate cannot resolve
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    /// Every sampled pixel was transparent or filtered out as extreme
    #[error("No colors extracted from image. Try a different image or disable extreme filtering.")]
    NoColorsExtracted,

    /// A palette was requested from an empty ranked color list
    #[error("Cannot build a palette from an empty color list")]
    EmptyPalette,

    /// Pixel data could not be accessed after decoding
    #[error("Pixel access failed: {0}")]
    PixelAccess(String),

    /// The settings store could not be read, parsed or written
    #[error("Settings error: {0}")]
    Settings(String),
}

impl ThemeError {
    /// Whether a different image (rather than a retry) is the sensible remedy
    pub fn suggests_different_image(&self) -> bool {
        matches!(
            self,
            ThemeError::NoColorsExtracted | ThemeError::EmptyPalette
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ThemeError>;

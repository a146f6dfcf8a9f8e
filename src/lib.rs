//! Tab Theme Studio Library
//!
//! Image-driven theme generation for a new-tab productivity surface. An
//! image is sampled into a weighted palette, the palette is turned into
//! several color-theory schemes, each scheme is checked (and if needed
//! repaired) against WCAG contrast, and the survivors are wrapped as named
//! themes ready to be written to the settings store.
//!
//! # Architecture
//!
//! Pipeline, leaves first:
//!
//! - [`color`] - sRGB/HSL primitives and WCAG contrast
//! - [`extraction`] - image decoding, sampling strategies, palette building
//! - [`scheme`] - scheme synthesis with seeded variation
//! - [`accessibility`] - contrast validation and repair
//! - [`theme`] - the staged generator and theme values
//! - [`settings`] - JSON settings store the chosen theme is applied to
//! - [`core`] - configuration and error types
//! - [`cli`] - command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tab_theme_studio::extraction::ImageSource;
//! use tab_theme_studio::theme::{ThemeGenerationOptions, ThemeGenerator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = ImageSource::parse("wallpaper.jpg")?;
//!     let mut generator = ThemeGenerator::new();
//!
//!     let options = ThemeGenerationOptions::default();
//!     let themes = generator.generate_themes(&source, &options)?;
//!     for theme in &themes {
//!         println!("{}: {}", theme.name, theme.description);
//!     }
//!
//!     // "Try again" reuses the decoded image with a new seed
//!     let more = generator.generate_themes(&source, &options.next_variation())?;
//!     assert!(more.len() <= options.max_themes);
//!     Ok(())
//! }
//! ```

pub mod accessibility;
pub mod cli;
pub mod color;
pub mod core;
pub mod extraction;
pub mod scheme;
pub mod settings;
pub mod theme;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Accent colour derivation.
//!
//! An image is decoded, sampled, quantized to a bounded palette and reduced
//! to one representative colour: the palette entry covering the most pixels.
//! [`score`] offers a ranked alternative for callers that want several
//! hue-distinct candidates.
//!
//! ```no_run
//! use matucalc::accent::{derive_accent, DeriveOptions};
//!
//! let accent = derive_accent("wallpaper.jpg".as_ref(), &DeriveOptions::default())?;
//! println!("{}", accent.colour);
//! # Ok::<(), matucalc::error::DerivationError>(())
//! ```

pub mod quantize;
pub mod score;

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::config::ConfigDir;
use crate::error::DerivationError;
use crate::types::Colour;

pub use quantize::{Celebi, QuantizedPalette, Quantizer, Wu, DEFAULT_MAX_COLOURS};
pub use score::{rank, score, ScoreOptions, Scored};

/// How an image is sampled and quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Sample every n-th pixel in row-major order. Values below 1 act as 1.
    pub quality: u32,
    /// Palette size cap.
    pub max_colours: usize,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            quality: 1,
            max_colours: DEFAULT_MAX_COLOURS,
        }
    }
}

/// Result of a derivation run.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedAccent {
    /// The most frequent palette colour.
    pub colour: Colour,
    pub palette: QuantizedPalette,
    /// Number of pixels that were sampled.
    pub sampled: usize,
}

impl DerivedAccent {
    /// Uppercase `#RRGGBB`.
    pub fn hex(&self) -> String {
        self.colour.to_string()
    }

    /// Hue-distinct candidates, best first.
    pub fn ranked(&self, options: &ScoreOptions) -> Vec<Colour> {
        score(&self.palette, options)
    }
}

/// Anything that can turn an image file into an accent colour.
pub trait AccentSource {
    fn derive(&self, path: &Path, options: &DeriveOptions) -> Result<DerivedAccent, DerivationError>;
}

/// Decodes with the `image` crate and quantizes in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSource<Q = Celebi> {
    quantizer: Q,
}

impl<Q: Quantizer> ImageSource<Q> {
    pub fn new(quantizer: Q) -> Self {
        Self { quantizer }
    }

    /// Derive from an already decoded image. `path` only labels errors.
    pub fn derive_image(
        &self,
        image: &DynamicImage,
        path: &Path,
        options: &DeriveOptions,
    ) -> Result<DerivedAccent, DerivationError> {
        let pixels = sample_pixels(image, options.quality);
        if pixels.is_empty() {
            return Err(DerivationError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        let palette = self.quantizer.quantize(&pixels, options.max_colours);
        debug!(
            sampled = pixels.len(),
            colours = palette.len(),
            "quantized {}",
            path.display()
        );

        let colour = palette.max_frequency().ok_or(DerivationError::EmptyPalette)?;
        Ok(DerivedAccent {
            colour,
            palette,
            sampled: pixels.len(),
        })
    }
}

impl<Q: Quantizer> AccentSource for ImageSource<Q> {
    fn derive(&self, path: &Path, options: &DeriveOptions) -> Result<DerivedAccent, DerivationError> {
        let image = image::open(path).map_err(|e| DerivationError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.derive_image(&image, path, options)
    }
}

/// Every `quality`-th pixel in row-major order, alpha dropped.
pub fn sample_pixels(image: &DynamicImage, quality: u32) -> Vec<Colour> {
    let step = quality.max(1) as usize;
    image
        .to_rgb8()
        .pixels()
        .step_by(step)
        .map(|p| Colour::from(p.0))
        .collect()
}

/// Derive with the default [`ImageSource`].
pub fn derive_accent(path: &Path, options: &DeriveOptions) -> Result<DerivedAccent, DerivationError> {
    ImageSource::<Celebi>::default().derive(path, options)
}

/// Derive and store the result as the fetched accent.
pub fn fetch_accent(
    source: &impl AccentSource,
    path: &Path,
    options: &DeriveOptions,
    config: &ConfigDir,
) -> Result<DerivedAccent, DerivationError> {
    let derived = source.derive(path, options)?;
    config.store_fetched(derived.colour)?;
    Ok(derived)
}

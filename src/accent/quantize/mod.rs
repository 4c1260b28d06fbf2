//! Palette quantization.
//!
//! [`Celebi`] chains Wu's box cut (fast, deterministic seeds) with weighted
//! k-means refinement in L*a*b*. Any [`Quantizer`] works as long as it
//! returns a bounded palette with per-colour pixel counts.

mod wsmeans;
mod wu;

use std::collections::{BTreeMap, HashMap};

use crate::types::Colour;

pub use wsmeans::{from_lab, to_lab};

/// Default palette size.
pub const DEFAULT_MAX_COLOURS: usize = 512;

/// A palette-reduction algorithm.
pub trait Quantizer {
    /// Reduce `pixels` to at most `max_colours` colours with pixel counts.
    fn quantize(&self, pixels: &[Colour], max_colours: usize) -> QuantizedPalette;
}

/// Wu box cut followed by weighted k-means.
#[derive(Debug, Clone, Copy, Default)]
pub struct Celebi;

impl Quantizer for Celebi {
    fn quantize(&self, pixels: &[Colour], max_colours: usize) -> QuantizedPalette {
        let counts = histogram(pixels);
        let seeds = wu::quantize(&counts, max_colours);
        QuantizedPalette::new(wsmeans::refine(&counts, &seeds, max_colours))
    }
}

/// Only Wu's box cut, no refinement. Cheaper, slightly coarser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wu;

impl Quantizer for Wu {
    fn quantize(&self, pixels: &[Colour], max_colours: usize) -> QuantizedPalette {
        let counts = histogram(pixels);
        let colours = wu::quantize(&counts, max_colours);
        // Give every source colour to the box average nearest it in L*a*b*
        QuantizedPalette::new(wsmeans::refine(&counts, &colours, colours.len()))
    }
}

/// Count occurrences of each colour.
pub fn histogram(pixels: &[Colour]) -> HashMap<Colour, u32> {
    let mut counts = HashMap::new();
    for &pixel in pixels {
        *counts.entry(pixel).or_insert(0) += 1;
    }
    counts
}

/// A quantized palette: colour to pixel count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantizedPalette {
    counts: HashMap<Colour, u32>,
}

impl QuantizedPalette {
    pub fn new(counts: HashMap<Colour, u32>) -> Self {
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total pixels represented.
    pub fn population(&self) -> u64 {
        self.counts.values().map(|&n| n as u64).sum()
    }

    pub fn count(&self, colour: Colour) -> Option<u32> {
        self.counts.get(&colour).copied()
    }

    pub fn counts(&self) -> &HashMap<Colour, u32> {
        &self.counts
    }

    /// The most frequent colour. Ties go to the smaller `0xRRGGBB` value.
    pub fn max_frequency(&self) -> Option<Colour> {
        self.counts
            .iter()
            .max_by(|a, b| {
                a.1.cmp(b.1)
                    .then_with(|| b.0.to_packed().cmp(&a.0.to_packed()))
            })
            .map(|(colour, _)| *colour)
    }

    /// Uppercase `#RRGGBB` keys, sorted.
    pub fn to_hex_map(&self) -> BTreeMap<String, u32> {
        self.counts
            .iter()
            .map(|(colour, &count)| (colour.to_string(), count))
            .collect()
    }

    /// Entries ordered by descending count, then ascending colour.
    pub fn sorted(&self) -> Vec<(Colour, u32)> {
        let mut entries: Vec<(Colour, u32)> = self.counts.iter().map(|(c, n)| (*c, *n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels(runs: &[(Colour, usize)]) -> Vec<Colour> {
        runs.iter()
            .flat_map(|(c, n)| std::iter::repeat(*c).take(*n))
            .collect()
    }

    #[test]
    fn test_celebi_keeps_exact_colours() {
        let red = Colour::rgb(255, 0, 0);
        let teal = Colour::rgb(0, 128, 128);
        let palette = Celebi.quantize(&pixels(&[(red, 30), (teal, 10)]), DEFAULT_MAX_COLOURS);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.count(red), Some(30));
        assert_eq!(palette.count(teal), Some(10));
        assert_eq!(palette.population(), 40);
        assert_eq!(palette.max_frequency(), Some(red));
    }

    #[test]
    fn test_celebi_bounds_palette() {
        let mut input = Vec::new();
        for r in 0..32u8 {
            for g in 0..32u8 {
                input.push(Colour::rgb(r * 8, g * 8, 255 - r * 4));
            }
        }
        let palette = Celebi.quantize(&input, 16);

        assert!(!palette.is_empty());
        assert!(palette.len() <= 16);
        assert_eq!(palette.population(), input.len() as u64);
    }

    #[test]
    fn test_wu_only() {
        let palette = Wu.quantize(
            &pixels(&[(Colour::BLACK, 3), (Colour::WHITE, 5)]),
            DEFAULT_MAX_COLOURS,
        );
        assert_eq!(palette.max_frequency(), Some(Colour::WHITE));
        assert_eq!(palette.population(), 8);
    }

    #[test]
    fn test_empty_input() {
        let palette = Celebi.quantize(&[], DEFAULT_MAX_COLOURS);
        assert!(palette.is_empty());
        assert_eq!(palette.max_frequency(), None);
    }

    #[test]
    fn test_max_frequency_tie_break() {
        let palette = QuantizedPalette::new(
            [(Colour::rgb(0, 0, 9), 4), (Colour::rgb(0, 0, 3), 4), (Colour::rgb(9, 9, 9), 1)]
                .into_iter()
                .collect(),
        );
        assert_eq!(palette.max_frequency(), Some(Colour::rgb(0, 0, 3)));
        assert_eq!(
            palette.sorted().first().map(|(c, _)| *c),
            Some(Colour::rgb(0, 0, 3))
        );
    }

    #[test]
    fn test_hex_map() {
        let palette = QuantizedPalette::new([(Colour::rgb(0xab, 0xcd, 0xef), 2)].into_iter().collect());
        let map = palette.to_hex_map();
        assert_eq!(map.get("#ABCDEF"), Some(&2));
    }
}

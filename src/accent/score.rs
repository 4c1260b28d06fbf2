//! Ranks palette colours by how well they would work as an accent.
//!
//! Scoring happens in CIE LCh. A colour's proportion is the share of pixels
//! whose hue falls in its neighbourhood, so a cluster of near-identical hues
//! counts together. Chroma rewards saturation above a target and tone
//! penalises colours far from the middle of the lightness range.

use palette::white_point::D65;
use palette::{IntoColor, Lab, Lch};

use super::quantize::{to_lab, QuantizedPalette};
use crate::types::Colour;

const TARGET_CHROMA: f64 = 48.0;
const WEIGHT_PROPORTION: f64 = 0.7;
const WEIGHT_CHROMA_ABOVE: f64 = 0.3;
const WEIGHT_CHROMA_BELOW: f64 = 0.1;
const WEIGHT_TONE: f64 = 0.1;
const CUTOFF_CHROMA: f64 = 5.0;
const CUTOFF_PROPORTION: f64 = 0.01;

/// Google blue.
pub const FALLBACK: Colour = Colour::rgb(0x42, 0x85, 0xf4);

/// Knobs for [`score`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreOptions {
    /// Stop once this many hue-distinct colours are chosen.
    pub desired: usize,
    /// Returned alone when nothing passes the filters.
    pub fallback: Colour,
    /// Drop greys and rare hues.
    pub filter: bool,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            desired: 4,
            fallback: FALLBACK,
            filter: true,
        }
    }
}

/// A palette colour with its LCh coordinates and score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub colour: Colour,
    pub hue: f64,
    pub chroma: f64,
    pub tone: f64,
    pub proportion: f64,
    pub score: f64,
}

fn lch(colour: Colour) -> (f64, f64, f64) {
    let [l, a, b] = to_lab(colour);
    let lch: Lch<D65, f64> = Lab::<D65, f64>::new(l, a, b).into_color();
    let hue = lch.hue.into_positive_degrees();
    (hue % 360.0, lch.chroma, lch.l)
}

fn hue_distance(a: f64, b: f64) -> f64 {
    180.0 - ((a - b).abs() - 180.0).abs()
}

fn hue_bucket(hue: f64) -> usize {
    (hue.round() as i64).rem_euclid(360) as usize
}

/// Share of `total` pixels within the hue neighbourhood of each degree.
fn excited_proportions(hues: impl IntoIterator<Item = (f64, u32)>, total: u64) -> [f64; 360] {
    let mut hue_population = [0u64; 360];
    for (hue, count) in hues {
        hue_population[hue_bucket(hue)] += count as u64;
    }

    let mut excited = [0.0f64; 360];
    for (hue, &population) in hue_population.iter().enumerate() {
        let proportion = population as f64 / total as f64;
        for offset in -14i64..16 {
            let neighbour = (hue as i64 + offset).rem_euclid(360) as usize;
            excited[neighbour] += proportion;
        }
    }
    excited
}

/// Score every colour in `palette`, highest first.
///
/// Unlike [`score`] this keeps every colour that passes the filters and does
/// not deduplicate hues.
pub fn rank(palette: &QuantizedPalette, filter: bool) -> Vec<Scored> {
    let total = palette.population();
    if total == 0 {
        return Vec::new();
    }

    let entries: Vec<(Colour, u32, (f64, f64, f64))> = palette
        .sorted()
        .into_iter()
        .map(|(colour, count)| (colour, count, lch(colour)))
        .collect();

    let excited = excited_proportions(
        entries.iter().map(|(_, count, (hue, _, _))| (*hue, *count)),
        total,
    );

    let mut scored: Vec<Scored> = entries
        .into_iter()
        .filter_map(|(colour, _, (hue, chroma, tone))| {
            let proportion = excited[hue_bucket(hue)];
            if filter && (chroma < CUTOFF_CHROMA || proportion <= CUTOFF_PROPORTION) {
                return None;
            }
            let chroma_weight = if chroma < TARGET_CHROMA {
                WEIGHT_CHROMA_BELOW
            } else {
                WEIGHT_CHROMA_ABOVE
            };
            let score = proportion * 100.0 * WEIGHT_PROPORTION
                + (chroma - TARGET_CHROMA) * chroma_weight
                - (tone - 50.0).abs() * WEIGHT_TONE;
            Some(Scored {
                colour,
                hue,
                chroma,
                tone,
                proportion,
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.colour.cmp(&b.colour))
    });
    scored
}

/// Pick up to `desired` accent candidates with distinct hues.
///
/// The required hue separation starts at 90° and shrinks to 15° until enough
/// colours qualify. Never empty: falls back to [`ScoreOptions::fallback`].
pub fn score(palette: &QuantizedPalette, options: &ScoreOptions) -> Vec<Colour> {
    let ranked = rank(palette, options.filter);

    let mut chosen: Vec<&Scored> = Vec::new();
    for separation in (15..=90).rev() {
        chosen.clear();
        for candidate in &ranked {
            let distinct = chosen
                .iter()
                .all(|c| hue_distance(c.hue, candidate.hue) >= separation as f64);
            if distinct {
                chosen.push(candidate);
            }
            if chosen.len() >= options.desired {
                break;
            }
        }
        if chosen.len() >= options.desired {
            break;
        }
    }

    if chosen.is_empty() {
        return vec![options.fallback];
    }
    chosen.into_iter().map(|s| s.colour).collect()
}

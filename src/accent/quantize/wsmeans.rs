//! Weighted k-means refinement in CIE L*a*b*.
//!
//! Starting from a set of seed colours, every distinct input colour is
//! assigned to its nearest cluster and cluster centres are recomputed as
//! population-weighted means until assignments settle.

use std::collections::HashMap;

use palette::white_point::D65;
use palette::{IntoColor, Lab, Srgb};

use crate::types::Colour;

/// Iteration cap.
const MAX_ITERATIONS: usize = 10;

/// A point only moves to another cluster when that gets it this much closer
/// (in L*a*b* units).
const MIN_MOVEMENT_DISTANCE: f64 = 3.0;

type Point = [f64; 3];

pub fn to_lab(colour: Colour) -> Point {
    let rgb = Srgb::new(
        colour.r as f64 / 255.0,
        colour.g as f64 / 255.0,
        colour.b as f64 / 255.0,
    );
    let lab: Lab<D65, f64> = rgb.into_color();
    [lab.l, lab.a, lab.b]
}

pub fn from_lab(point: Point) -> Colour {
    let lab: Lab<D65, f64> = Lab::new(point[0], point[1], point[2]);
    let rgb: Srgb<f64> = lab.into_color();
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Colour::rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

fn distance(a: &Point, b: &Point) -> f64 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Refine `seeds` against the colour histogram. Returns each non-empty
/// cluster's colour with the number of pixels assigned to it.
pub fn refine(
    counts: &HashMap<Colour, u32>,
    seeds: &[Colour],
    max_colours: usize,
) -> HashMap<Colour, u32> {
    // Stable point order keeps the output independent of hash iteration
    let mut entries: Vec<(Colour, u32)> = counts.iter().map(|(c, n)| (*c, *n)).collect();
    entries.sort_unstable_by_key(|(c, _)| c.to_packed());

    let points: Vec<Point> = entries.iter().map(|(c, _)| to_lab(*c)).collect();
    let weights: Vec<u32> = entries.iter().map(|(_, n)| *n).collect();

    let mut cluster_count = max_colours.min(points.len());
    if !seeds.is_empty() {
        cluster_count = cluster_count.min(seeds.len());
    }
    if cluster_count == 0 {
        return HashMap::new();
    }

    let mut clusters: Vec<Point> = if seeds.is_empty() {
        // Spread seeds evenly over the distinct colours
        (0..cluster_count)
            .map(|i| points[i * points.len() / cluster_count])
            .collect()
    } else {
        seeds.iter().take(cluster_count).map(|c| to_lab(*c)).collect()
    };

    let mut assignment = vec![0usize; points.len()];
    let mut populations = vec![0u64; cluster_count];
    let mut centre_distances = vec![vec![0.0f64; cluster_count]; cluster_count];

    for iteration in 0..MAX_ITERATIONS {
        for i in 0..cluster_count {
            for j in (i + 1)..cluster_count {
                let d = distance(&clusters[i], &clusters[j]);
                centre_distances[i][j] = d;
                centre_distances[j][i] = d;
            }
        }

        let mut moved = 0usize;
        for (i, point) in points.iter().enumerate() {
            let previous = assignment[i];
            let previous_distance = distance(point, &clusters[previous]);
            let mut best_distance = previous_distance;
            let mut best = None;

            for j in 0..cluster_count {
                // Triangle inequality: j cannot beat the current cluster
                if centre_distances[previous][j] >= 4.0 * previous_distance {
                    continue;
                }
                let d = distance(point, &clusters[j]);
                if d < best_distance {
                    best_distance = d;
                    best = Some(j);
                }
            }

            if let Some(j) = best {
                if iteration == 0
                    || (best_distance.sqrt() - previous_distance.sqrt()).abs()
                        > MIN_MOVEMENT_DISTANCE
                {
                    moved += 1;
                    assignment[i] = j;
                }
            }
        }

        if moved == 0 && iteration != 0 {
            break;
        }

        let mut sums = vec![[0.0f64; 3]; cluster_count];
        populations.iter_mut().for_each(|p| *p = 0);
        for (i, point) in points.iter().enumerate() {
            let cluster = assignment[i];
            let weight = weights[i] as f64;
            populations[cluster] += weights[i] as u64;
            for axis in 0..3 {
                sums[cluster][axis] += point[axis] * weight;
            }
        }

        for (k, cluster) in clusters.iter_mut().enumerate() {
            // An emptied cluster keeps its old centre
            if populations[k] == 0 {
                continue;
            }
            let population = populations[k] as f64;
            *cluster = [
                sums[k][0] / population,
                sums[k][1] / population,
                sums[k][2] / population,
            ];
        }
    }

    let mut result: HashMap<Colour, u32> = HashMap::new();
    for (cluster, &population) in clusters.iter().zip(&populations) {
        if population == 0 {
            continue;
        }
        let colour = from_lab(*cluster);
        // Two centres can round to the same sRGB colour
        let count = result.entry(colour).or_insert(0);
        *count = count.saturating_add(population.min(u32::MAX as u64) as u32);
    }
    result
}

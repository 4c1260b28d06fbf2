//! Wu's colour quantizer.
//!
//! Builds a 33x33x33 cumulative moment table over 5-bit-per-channel colour
//! bins, then repeatedly splits the box with the largest variance along the
//! axis and position that best separates it. Each final box becomes one
//! colour: the weighted mean of the pixels inside it.

use std::collections::HashMap;

use crate::types::Colour;

const INDEX_BITS: u32 = 5;
const SIDE: usize = (1 << INDEX_BITS) + 1;
const TABLE_SIZE: usize = SIDE * SIDE * SIDE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Red,
    Green,
    Blue,
}

/// An axis-aligned box of histogram bins, exclusive on the low side.
#[derive(Debug, Clone, Copy, Default)]
struct Cube {
    r0: usize,
    r1: usize,
    g0: usize,
    g1: usize,
    b0: usize,
    b1: usize,
    vol: usize,
}

impl Cube {
    fn update_volume(&mut self) {
        self.vol = (self.r1 - self.r0) * (self.g1 - self.g0) * (self.b1 - self.b0);
    }
}

fn index(r: usize, g: usize, b: usize) -> usize {
    r * SIDE * SIDE + g * SIDE + b
}

/// Cumulative moments of the colour histogram.
struct Moments {
    weights: Vec<i64>,
    r: Vec<i64>,
    g: Vec<i64>,
    b: Vec<i64>,
    sq: Vec<f64>,
}

impl Moments {
    fn from_counts(counts: &HashMap<Colour, u32>) -> Self {
        let mut m = Moments {
            weights: vec![0; TABLE_SIZE],
            r: vec![0; TABLE_SIZE],
            g: vec![0; TABLE_SIZE],
            b: vec![0; TABLE_SIZE],
            sq: vec![0.0; TABLE_SIZE],
        };

        let shift = 8 - INDEX_BITS;
        for (colour, &count) in counts {
            let i = index(
                (colour.r >> shift) as usize + 1,
                (colour.g >> shift) as usize + 1,
                (colour.b >> shift) as usize + 1,
            );
            let count = count as i64;
            let (r, g, b) = (colour.r as i64, colour.g as i64, colour.b as i64);
            m.weights[i] += count;
            m.r[i] += r * count;
            m.g[i] += g * count;
            m.b[i] += b * count;
            m.sq[i] += (count * (r * r + g * g + b * b)) as f64;
        }

        m.accumulate();
        m
    }

    /// Turn per-bin sums into 3D prefix sums.
    fn accumulate(&mut self) {
        for r in 1..SIDE {
            let mut area = [0i64; SIDE];
            let mut area_r = [0i64; SIDE];
            let mut area_g = [0i64; SIDE];
            let mut area_b = [0i64; SIDE];
            let mut area_sq = [0f64; SIDE];

            for g in 1..SIDE {
                let (mut line, mut line_r, mut line_g, mut line_b) = (0i64, 0i64, 0i64, 0i64);
                let mut line_sq = 0f64;

                for b in 1..SIDE {
                    let i = index(r, g, b);
                    line += self.weights[i];
                    line_r += self.r[i];
                    line_g += self.g[i];
                    line_b += self.b[i];
                    line_sq += self.sq[i];

                    area[b] += line;
                    area_r[b] += line_r;
                    area_g[b] += line_g;
                    area_b[b] += line_b;
                    area_sq[b] += line_sq;

                    let prev = index(r - 1, g, b);
                    self.weights[i] = self.weights[prev] + area[b];
                    self.r[i] = self.r[prev] + area_r[b];
                    self.g[i] = self.g[prev] + area_g[b];
                    self.b[i] = self.b[prev] + area_b[b];
                    self.sq[i] = self.sq[prev] + area_sq[b];
                }
            }
        }
    }

    fn variance(&self, cube: &Cube) -> f64 {
        let dr = volume(cube, &self.r) as f64;
        let dg = volume(cube, &self.g) as f64;
        let db = volume(cube, &self.b) as f64;
        let xx = volume_f64(cube, &self.sq);
        let weight = volume(cube, &self.weights) as f64;
        if weight == 0.0 {
            return 0.0;
        }
        xx - (dr * dr + dg * dg + db * db) / weight
    }

    /// Split `one` in place, writing the upper half to `two`.
    fn cut(&self, one: &mut Cube, two: &mut Cube) -> bool {
        let whole = [
            volume(one, &self.r),
            volume(one, &self.g),
            volume(one, &self.b),
            volume(one, &self.weights),
        ];

        let (cut_r, max_r) = self.maximize(one, Axis::Red, one.r0 + 1, one.r1, whole);
        let (cut_g, max_g) = self.maximize(one, Axis::Green, one.g0 + 1, one.g1, whole);
        let (cut_b, max_b) = self.maximize(one, Axis::Blue, one.b0 + 1, one.b1, whole);

        let (axis, cut) = if max_r >= max_g && max_r >= max_b {
            (Axis::Red, cut_r)
        } else if max_g >= max_r && max_g >= max_b {
            (Axis::Green, cut_g)
        } else {
            (Axis::Blue, cut_b)
        };
        let Some(cut) = cut else {
            return false;
        };

        two.r1 = one.r1;
        two.g1 = one.g1;
        two.b1 = one.b1;

        match axis {
            Axis::Red => {
                one.r1 = cut;
                two.r0 = cut;
                two.g0 = one.g0;
                two.b0 = one.b0;
            }
            Axis::Green => {
                one.g1 = cut;
                two.r0 = one.r0;
                two.g0 = cut;
                two.b0 = one.b0;
            }
            Axis::Blue => {
                one.b1 = cut;
                two.r0 = one.r0;
                two.g0 = one.g0;
                two.b0 = cut;
            }
        }

        one.update_volume();
        two.update_volume();
        true
    }

    /// Find the split position along `axis` that maximizes the summed
    /// between-half variance. Returns the position (if any) and its score.
    fn maximize(
        &self,
        cube: &Cube,
        axis: Axis,
        first: usize,
        last: usize,
        whole: [i64; 4],
    ) -> (Option<usize>, f64) {
        let base = [
            bottom(cube, axis, &self.r),
            bottom(cube, axis, &self.g),
            bottom(cube, axis, &self.b),
            bottom(cube, axis, &self.weights),
        ];

        let mut best = 0.0;
        let mut best_cut = None;

        for position in first..last {
            let lower = [
                base[0] + top(cube, axis, position, &self.r),
                base[1] + top(cube, axis, position, &self.g),
                base[2] + top(cube, axis, position, &self.b),
                base[3] + top(cube, axis, position, &self.weights),
            ];
            if lower[3] == 0 {
                continue;
            }
            let upper = [
                whole[0] - lower[0],
                whole[1] - lower[1],
                whole[2] - lower[2],
                whole[3] - lower[3],
            ];
            if upper[3] == 0 {
                continue;
            }

            let score = |half: [i64; 4]| {
                let (r, g, b, w) = (half[0] as f64, half[1] as f64, half[2] as f64, half[3] as f64);
                (r * r + g * g + b * b) / w
            };
            let temp = score(lower) + score(upper);
            if temp > best {
                best = temp;
                best_cut = Some(position);
            }
        }

        (best_cut, best)
    }
}

fn volume(cube: &Cube, m: &[i64]) -> i64 {
    m[index(cube.r1, cube.g1, cube.b1)] - m[index(cube.r1, cube.g1, cube.b0)]
        - m[index(cube.r1, cube.g0, cube.b1)]
        + m[index(cube.r1, cube.g0, cube.b0)]
        - m[index(cube.r0, cube.g1, cube.b1)]
        + m[index(cube.r0, cube.g1, cube.b0)]
        + m[index(cube.r0, cube.g0, cube.b1)]
        - m[index(cube.r0, cube.g0, cube.b0)]
}

fn volume_f64(cube: &Cube, m: &[f64]) -> f64 {
    m[index(cube.r1, cube.g1, cube.b1)] - m[index(cube.r1, cube.g1, cube.b0)]
        - m[index(cube.r1, cube.g0, cube.b1)]
        + m[index(cube.r1, cube.g0, cube.b0)]
        - m[index(cube.r0, cube.g1, cube.b1)]
        + m[index(cube.r0, cube.g1, cube.b0)]
        + m[index(cube.r0, cube.g0, cube.b1)]
        - m[index(cube.r0, cube.g0, cube.b0)]
}

/// Moment of the cube's face at its lower bound on `axis`, negated.
fn bottom(cube: &Cube, axis: Axis, m: &[i64]) -> i64 {
    match axis {
        Axis::Red => {
            -m[index(cube.r0, cube.g1, cube.b1)] + m[index(cube.r0, cube.g1, cube.b0)]
                + m[index(cube.r0, cube.g0, cube.b1)]
                - m[index(cube.r0, cube.g0, cube.b0)]
        }
        Axis::Green => {
            -m[index(cube.r1, cube.g0, cube.b1)] + m[index(cube.r1, cube.g0, cube.b0)]
                + m[index(cube.r0, cube.g0, cube.b1)]
                - m[index(cube.r0, cube.g0, cube.b0)]
        }
        Axis::Blue => {
            -m[index(cube.r1, cube.g1, cube.b0)] + m[index(cube.r1, cube.g0, cube.b0)]
                + m[index(cube.r0, cube.g1, cube.b0)]
                - m[index(cube.r0, cube.g0, cube.b0)]
        }
    }
}

/// Moment of the slice at `position` on `axis`.
fn top(cube: &Cube, axis: Axis, position: usize, m: &[i64]) -> i64 {
    match axis {
        Axis::Red => {
            m[index(position, cube.g1, cube.b1)] - m[index(position, cube.g1, cube.b0)]
                - m[index(position, cube.g0, cube.b1)]
                + m[index(position, cube.g0, cube.b0)]
        }
        Axis::Green => {
            m[index(cube.r1, position, cube.b1)] - m[index(cube.r1, position, cube.b0)]
                - m[index(cube.r0, position, cube.b1)]
                + m[index(cube.r0, position, cube.b0)]
        }
        Axis::Blue => {
            m[index(cube.r1, cube.g1, position)] - m[index(cube.r1, cube.g0, position)]
                - m[index(cube.r0, cube.g1, position)]
                + m[index(cube.r0, cube.g0, position)]
        }
    }
}

/// Reduce a colour histogram to at most `max_colours` box averages.
pub fn quantize(counts: &HashMap<Colour, u32>, max_colours: usize) -> Vec<Colour> {
    if counts.is_empty() || max_colours == 0 {
        return Vec::new();
    }

    let moments = Moments::from_counts(counts);

    let mut cubes = vec![Cube::default(); max_colours];
    cubes[0] = Cube {
        r0: 0,
        r1: SIDE - 1,
        g0: 0,
        g1: SIDE - 1,
        b0: 0,
        b1: SIDE - 1,
        vol: 0,
    };
    cubes[0].update_volume();

    let mut variances = vec![0.0f64; max_colours];
    let mut generated = max_colours;
    let mut next = 0;
    let mut i = 1;

    while i < max_colours {
        let (head, tail) = cubes.split_at_mut(i);
        if moments.cut(&mut head[next], &mut tail[0]) {
            variances[next] = if head[next].vol > 1 {
                moments.variance(&head[next])
            } else {
                0.0
            };
            variances[i] = if tail[0].vol > 1 {
                moments.variance(&tail[0])
            } else {
                0.0
            };
        } else {
            variances[next] = 0.0;
            i -= 1;
        }

        next = 0;
        let mut best = variances[0];
        for (j, &v) in variances.iter().enumerate().take(i + 1).skip(1) {
            if v > best {
                best = v;
                next = j;
            }
        }

        if best <= 0.0 {
            generated = i + 1;
            break;
        }
        i += 1;
    }

    cubes
        .iter()
        .take(generated)
        .filter_map(|cube| {
            let weight = volume(cube, &moments.weights);
            if weight <= 0 {
                return None;
            }
            let mean = |m: &[i64]| (volume(cube, m) as f64 / weight as f64).round() as u8;
            Some(Colour::rgb(mean(&moments.r), mean(&moments.g), mean(&moments.b)))
        })
        .collect()
}

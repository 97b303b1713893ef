//! Seamless cloning by solving a discrete Poisson equation.
//!
//! Inside the region `Ω` the output `f` must have the same discrete
//! Laplacian as the patch `g`, while on the boundary it must equal the
//! original image `t`. For every pixel `p ∈ Ω` with in-image 4-neighbours
//! `N(p)`:
//!
//! ```text
//! |N(p)| f_p - Σ_{q ∈ N(p) ∩ Ω} f_q = Σ_{q ∈ N(p)} (g_p - g_q) + Σ_{q ∈ N(p) \ Ω} t_q
//! ```
//!
//! Neighbours outside the image are dropped from the stencil. The system is
//! symmetric positive definite as long as `Ω` has at least one neighbour
//! outside it, so it is solved per channel with conjugate gradients.

use image::{Rgb, RgbImage};

/// Row of the sparse system: diagonal plus up to four off-diagonal columns.
#[derive(Debug, Clone, Copy)]
struct Row {
    diag: f64,
    cols: [usize; 4],
    len: usize,
}

/// Sparse Poisson system over the pixels of a region.
#[derive(Debug)]
pub(crate) struct PoissonSystem {
    width: usize,
    height: usize,
    /// Image index of each unknown.
    pixels: Vec<usize>,
    /// Unknown index of each image pixel, if it is inside the region.
    unknown: Vec<Option<usize>>,
    rows: Vec<Row>,
    /// Whether any unknown touches a fixed boundary pixel.
    anchored: bool,
}

/// Outcome of one channel solve.
#[derive(Debug, Clone)]
pub(crate) struct ChannelSolution {
    /// Full plane: solved values inside the region, target values elsewhere.
    pub values: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

impl PoissonSystem {
    /// Build the system for `region` (row-major, `width * height` flags).
    pub(crate) fn new(region: &[bool], width: usize, height: usize) -> Self {
        debug_assert_eq!(region.len(), width * height);

        let mut unknown = vec![None; region.len()];
        let mut pixels = Vec::new();
        for (idx, &inside) in region.iter().enumerate() {
            if inside {
                unknown[idx] = Some(pixels.len());
                pixels.push(idx);
            }
        }

        let mut anchored = false;
        let rows = pixels
            .iter()
            .map(|&idx| {
                let mut row = Row {
                    diag: 0.0,
                    cols: [0; 4],
                    len: 0,
                };
                for q in neighbours(idx, width, height).into_iter().flatten() {
                    row.diag += 1.0;
                    match unknown[q] {
                        Some(col) => {
                            row.cols[row.len] = col;
                            row.len += 1;
                        }
                        None => anchored = true,
                    }
                }
                row
            })
            .collect();

        Self {
            width,
            height,
            pixels,
            unknown,
            rows,
            anchored,
        }
    }

    #[inline]
    pub(crate) fn unknowns(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the region has fixed boundary values to anchor the solve.
    #[inline]
    pub(crate) fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Solve one channel. `source` is the patch plane, `target` the original.
    pub(crate) fn solve(
        &self,
        source: &[f64],
        target: &[f64],
        max_iterations: usize,
        tolerance: f64,
    ) -> ChannelSolution {
        let n = self.unknowns();
        let b: Vec<f64> = self
            .pixels
            .iter()
            .map(|&idx| {
                let mut rhs = 0.0;
                let stencil = neighbours(idx, self.width, self.height);
                for q in stencil.into_iter().flatten() {
                    rhs += source[idx] - source[q];
                    if self.unknown[q].is_none() {
                        rhs += target[q];
                    }
                }
                rhs
            })
            .collect();

        // Start from the patch itself.
        let mut x: Vec<f64> = self.pixels.iter().map(|&idx| source[idx]).collect();
        let mut r: Vec<f64> = {
            let ax = self.apply(&x);
            b.iter().zip(&ax).map(|(bi, ai)| bi - ai).collect()
        };
        let mut p = r.clone();
        let mut rr = dot(&r, &r);
        let threshold = tolerance * dot(&b, &b).sqrt().max(1.0);

        let mut iterations = 0;
        let mut converged = rr.sqrt() <= threshold;
        while !converged && iterations < max_iterations {
            let ap = self.apply(&p);
            let pap = dot(&p, &ap);
            if pap <= 0.0 {
                break;
            }
            let alpha = rr / pap;
            for i in 0..n {
                x[i] += alpha * p[i];
                r[i] -= alpha * ap[i];
            }
            let rr_next = dot(&r, &r);
            iterations += 1;
            converged = rr_next.sqrt() <= threshold;

            let beta = rr_next / rr;
            for i in 0..n {
                p[i] = r[i] + beta * p[i];
            }
            rr = rr_next;
        }

        let mut values = target.to_vec();
        for (i, &idx) in self.pixels.iter().enumerate() {
            values[idx] = x[i];
        }

        ChannelSolution {
            values,
            iterations,
            converged,
        }
    }

    fn apply(&self, x: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .zip(x)
            .map(|(row, &xi)| {
                let off: f64 = row.cols[..row.len].iter().map(|&c| x[c]).sum();
                row.diag * xi - off
            })
            .collect()
    }
}

/// Clone the region of `patch` into `original` seamlessly.
///
/// `patch` and `original` must have the same dimensions and `region` one
/// flag per pixel. Pixels outside the region are copied from `original`.
/// A region without any boundary (every pixel masked) returns `patch`.
pub fn seamless_clone(
    original: &RgbImage,
    patch: &RgbImage,
    region: &[bool],
    max_iterations: usize,
    tolerance: f64,
) -> RgbImage {
    let (width, height) = original.dimensions();
    debug_assert_eq!(patch.dimensions(), (width, height));

    let system = PoissonSystem::new(region, width as usize, height as usize);
    if system.unknowns() == 0 {
        return original.clone();
    }
    if !system.is_anchored() {
        return patch.clone();
    }

    let mut planes: [Vec<f64>; 3] = Default::default();
    for (channel, plane) in planes.iter_mut().enumerate() {
        let source = channel_plane(patch, channel);
        let target = channel_plane(original, channel);
        let solution = system.solve(&source, &target, max_iterations, tolerance);
        if !solution.converged {
            tracing::warn!(
                channel,
                iterations = solution.iterations,
                unknowns = system.unknowns(),
                "Poisson solve stopped before reaching tolerance"
            );
        } else {
            tracing::trace!(
                channel,
                iterations = solution.iterations,
                unknowns = system.unknowns(),
                "Poisson channel solved"
            );
        }
        *plane = solution.values;
    }

    RgbImage::from_fn(width, height, |x, y| {
        let idx = y as usize * width as usize + x as usize;
        if region[idx] {
            Rgb([
                to_u8(planes[0][idx]),
                to_u8(planes[1][idx]),
                to_u8(planes[2][idx]),
            ])
        } else {
            *original.get_pixel(x, y)
        }
    })
}

fn channel_plane(image: &RgbImage, channel: usize) -> Vec<f64> {
    image.pixels().map(|p| p.0[channel] as f64).collect()
}

/// In-image 4-neighbours of `idx` (left, right, up, down).
fn neighbours(idx: usize, width: usize, height: usize) -> [Option<usize>; 4] {
    let (x, y) = (idx % width, idx / width);
    [
        (x > 0).then(|| idx - 1),
        (x + 1 < width).then(|| idx + 1),
        (y > 0).then(|| idx - width),
        (y + 1 < height).then(|| idx + width),
    ]
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

//! Blend weight maps and mask feathering.
//!
//! A weight map holds one `f32` in `[0, 1]` per pixel: 0 keeps the original,
//! 1 takes the patch. Feathering convolves the map so the transition band
//! spreads across several pixels. Borders replicate the edge value.

use image::{GrayImage, ImageBuffer, Luma};

use super::kernel::{gaussian_weights, Kernel};

/// Per-pixel blend weights in `[0, 1]`.
pub type WeightMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Normalize a mask to weights: `value / 255`.
pub fn weights_from_mask(mask: &GrayImage) -> WeightMap {
    let (width, height) = mask.dimensions();
    let data = mask.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    weight_map(width, height, data)
}

/// Convolve a weight map with a square kernel.
pub fn convolve(weights: &WeightMap, kernel: &Kernel) -> WeightMap {
    let (width, height) = weights.dimensions();
    let (w, h) = (width as i64, height as i64);
    let src = weights.as_raw();
    let radius = kernel.radius() as i64;
    let divisor = kernel.divisor as f32;

    let mut out = Vec::with_capacity(src.len());
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for ky in -radius..=radius {
                let sy = (y + ky).clamp(0, h - 1);
                let row = (ky + radius) as usize * kernel.size;
                for kx in -radius..=radius {
                    let sx = (x + kx).clamp(0, w - 1);
                    let weight = kernel.weights[row + (kx + radius) as usize] as f32;
                    acc += weight * src[(sy * w + sx) as usize];
                }
            }
            out.push((acc / divisor).clamp(0.0, 1.0));
        }
    }
    weight_map(width, height, out)
}

/// Separable Gaussian blur of a weight map.
///
/// The kernel never reaches further than the larger map dimension; beyond
/// that every tap reads a replicated edge value.
pub fn gaussian_blur(weights: &WeightMap, sigma: f32) -> WeightMap {
    let (width, height) = weights.dimensions();
    let taps = gaussian_weights(sigma, width.max(height) as usize);
    if taps.len() == 1 {
        return weights.clone();
    }

    let (w, h) = (width as usize, height as usize);
    let horizontal = blur_pass(weights.as_raw(), w, h, &taps, true);
    let vertical = blur_pass(&horizontal, w, h, &taps, false);
    weight_map(width, height, vertical)
}

fn blur_pass(
    src: &[f32],
    width: usize,
    height: usize,
    taps: &[f32],
    horizontal: bool,
) -> Vec<f32> {
    let radius = (taps.len() / 2) as i64;
    let (w, h) = (width as i64, height as i64);
    let mut out = Vec::with_capacity(src.len());

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (i, tap) in taps.iter().enumerate() {
                let offset = i as i64 - radius;
                let (sx, sy) = if horizontal {
                    ((x + offset).clamp(0, w - 1), y)
                } else {
                    (x, (y + offset).clamp(0, h - 1))
                };
                acc += tap * src[(sy * w + sx) as usize];
            }
            out.push(acc.clamp(0.0, 1.0));
        }
    }
    out
}

fn weight_map(width: u32, height: u32, data: Vec<f32>) -> WeightMap {
    debug_assert_eq!(data.len(), width as usize * height as usize);
    // Unreachable: every caller produces exactly one value per pixel.
    ImageBuffer::from_raw(width, height, data).unwrap_or_else(|| ImageBuffer::new(width, height))
}

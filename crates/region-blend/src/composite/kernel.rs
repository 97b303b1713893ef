//! Mask feathering kernels.
//!
//! Each kernel is a square, symmetric weight table applied to the blend
//! weight map before the convex combination. Wider kernels produce a wider
//! transition band between patch and original.

/// A square smoothing kernel.
///
/// `weights` holds `size * size` entries in row-major order, centred on the
/// middle entry. Each output value is `sum(weight * input) / divisor`.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// Row-major weights, `size * size` entries.
    pub weights: &'static [u16],

    /// Side length (always odd).
    pub size: usize,

    /// Normalizing divisor, equal to the sum of the weights.
    pub divisor: u16,
}

impl Kernel {
    /// Distance from the centre entry to the kernel edge.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }
}

/// 3x3 smoothing kernel used by [`BlendType::Smooth`](crate::BlendType::Smooth).
///
/// ```text
///    1   1   1
///    1   5   1
///    1   1   1
/// ```
pub const SMOOTH: Kernel = Kernel {
    weights: &[
        1, 1, 1, //
        1, 5, 1, //
        1, 1, 1,
    ],
    size: 3,
    divisor: 13,
};

/// 5x5 smoothing kernel used by
/// [`BlendType::Smoother`](crate::BlendType::Smoother).
///
/// Reaches two pixels out, so the feathered band is roughly twice as wide
/// as with [`SMOOTH`].
///
/// ```text
///    1   1   1   1   1
///    1   5   5   5   1
///    1   5  44   5   1
///    1   5   5   5   1
///    1   1   1   1   1
/// ```
pub const SMOOTHER: Kernel = Kernel {
    weights: &[
        1, 1, 1, 1, 1, //
        1, 5, 5, 5, 1, //
        1, 5, 44, 5, 1, //
        1, 5, 5, 5, 1, //
        1, 1, 1, 1, 1,
    ],
    size: 5,
    divisor: 100,
};

/// Normalized 1-D Gaussian weights for a separable blur.
///
/// The radius is `ceil(3 * sigma)`, truncated to `max_radius`; a
/// non-positive `sigma` yields the identity kernel `[1.0]`.
pub fn gaussian_weights(sigma: f32, max_radius: usize) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let radius = ((3.0 * f64::from(sigma)).ceil() as usize).min(max_radius) as i64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / denom).exp() as f32)
        .collect();

    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

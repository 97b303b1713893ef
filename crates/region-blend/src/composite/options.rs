//! Compositing options and configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::DEFAULT_MASK_THRESHOLD;
use crate::policy::PolicyError;

/// Largest accepted Gaussian sigma, in pixels.
///
/// Feathering wider than this is indistinguishable from a flat blend on any
/// realistic region.
pub const MAX_GAUSSIAN_SIGMA: f32 = 256.0;

/// Tuning knobs for the compositor.
///
/// # Defaults
///
/// - Gaussian sigma: 3.0 pixels
/// - Poisson solver: at most 2000 iterations, relative residual 1e-4
/// - Mask threshold: 0 (any non-zero mask value counts as masked)
///
/// # Example
///
/// ```
/// use region_blend::BlendOptions;
///
/// let options = BlendOptions::new()
///     .gaussian_sigma(5.0)
///     .poisson_max_iterations(500);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendOptions {
    /// Standard deviation of the Gaussian feathering kernel, in pixels.
    pub gaussian_sigma: f32,

    /// Iteration cap for the conjugate-gradient Poisson solve.
    pub poisson_max_iterations: usize,

    /// Relative residual at which the Poisson solve stops.
    pub poisson_tolerance: f64,

    /// Mask values strictly above this are treated as masked for the hard
    /// cut and the Poisson region.
    pub mask_threshold: u8,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            gaussian_sigma: 3.0,
            poisson_max_iterations: 2000,
            poisson_tolerance: 1e-4,
            mask_threshold: DEFAULT_MASK_THRESHOLD,
        }
    }
}

impl BlendOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Gaussian feathering sigma.
    #[inline]
    pub fn gaussian_sigma(mut self, sigma: f32) -> Self {
        self.gaussian_sigma = sigma;
        self
    }

    /// Set the Poisson iteration cap.
    #[inline]
    pub fn poisson_max_iterations(mut self, iterations: usize) -> Self {
        self.poisson_max_iterations = iterations;
        self
    }

    /// Set the Poisson relative residual tolerance.
    #[inline]
    pub fn poisson_tolerance(mut self, tolerance: f64) -> Self {
        self.poisson_tolerance = tolerance;
        self
    }

    /// Set the mask threshold.
    #[inline]
    pub fn mask_threshold(mut self, threshold: u8) -> Self {
        self.mask_threshold = threshold;
        self
    }

    /// Reject option values the compositor cannot work with.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(0.0..=MAX_GAUSSIAN_SIGMA).contains(&self.gaussian_sigma) {
            return Err(PolicyError::InvalidOption(format!(
                "gaussian_sigma must be between 0 and {MAX_GAUSSIAN_SIGMA}, got {}",
                self.gaussian_sigma
            )));
        }
        if self.poisson_max_iterations == 0 {
            return Err(PolicyError::InvalidOption(
                "poisson_max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.poisson_tolerance.is_finite() || self.poisson_tolerance <= 0.0 {
            return Err(PolicyError::InvalidOption(format!(
                "poisson_tolerance must be positive, got {}",
                self.poisson_tolerance
            )));
        }
        Ok(())
    }
}

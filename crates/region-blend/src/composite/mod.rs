//! Recombining a model output with the original image.
//!
//! The compositor undoes the region transform recorded in a
//! [`RegionMapping`]: the model output is resized back to the mapped box,
//! placed onto a copy of the original, and then merged under a postprocess
//! policy. Every strategy returns an image with the original's dimensions.

pub mod feather;
pub mod kernel;
mod options;
pub mod poisson;

pub use feather::{convolve, gaussian_blur, weights_from_mask, WeightMap};
pub use kernel::{gaussian_weights, Kernel, SMOOTH, SMOOTHER};
pub use options::{BlendOptions, MAX_GAUSSIAN_SIGMA};
pub use poisson::seamless_clone;

use image::{imageops, GrayImage, Rgb, RgbImage};

use crate::api::RegionError;
use crate::geometry::{has_masked_pixels, GeometryError};
use crate::policy::{BlendType, Policies, PostprocessType};
use crate::region::{resize_image, RegionMapping};

/// Composite `model_output` back into `original` with default options.
///
/// See [`composite_with_options`].
pub fn composite(
    original: &RgbImage,
    mask: &GrayImage,
    model_output: &RgbImage,
    mapping: RegionMapping,
    postprocess: PostprocessType,
    blend: BlendType,
) -> Result<RgbImage, RegionError> {
    composite_with_options(
        original,
        mask,
        model_output,
        mapping,
        postprocess,
        blend,
        &BlendOptions::default(),
    )
}

/// Composite `model_output` back into `original`.
///
/// `model_output` must have the mapping's target dimensions and `mask` the
/// original's dimensions.
///
/// # Errors
///
/// - [`GeometryError::DimensionMismatch`] if `mask` and `original` differ
/// - [`GeometryError::MappingMismatch`] / [`GeometryError::BoxOutOfBounds`]
///   if `mapping` does not describe `original`
/// - [`RegionError::ContractViolation`] if `model_output` has the wrong size
/// - [`PolicyError`](crate::PolicyError) for inconsistent policies or options
/// - [`GeometryError::EmptyMask`] for an empty mask with
///   [`PostprocessType::DirectReplace`] or [`PostprocessType::Blend`]
pub fn composite_with_options(
    original: &RgbImage,
    mask: &GrayImage,
    model_output: &RgbImage,
    mapping: RegionMapping,
    postprocess: PostprocessType,
    blend: BlendType,
    options: &BlendOptions,
) -> Result<RgbImage, RegionError> {
    if original.dimensions() != mask.dimensions() {
        let err = GeometryError::dimension_mismatch(original.dimensions(), mask.dimensions());
        return Err(err.into());
    }
    mapping.validate_against(original.dimensions())?;
    if model_output.dimensions() != mapping.target_dimensions() {
        return Err(RegionError::contract_violation(
            mapping.target_dimensions(),
            model_output.dimensions(),
        ));
    }

    Policies::new(mapping.preprocess, postprocess, blend).validate()?;
    if postprocess != PostprocessType::Blend && blend != BlendType::None {
        tracing::debug!(%postprocess, %blend, "Blend type ignored for non-blend postprocess");
    }
    options.validate()?;

    let threshold = options.mask_threshold;
    if postprocess != PostprocessType::None && !has_masked_pixels(mask, threshold) {
        return Err(GeometryError::EmptyMask { threshold }.into());
    }

    let canvas = place_patch(original, model_output, &mapping);

    let result = match postprocess {
        PostprocessType::None => canvas,
        PostprocessType::DirectReplace => direct_replace(original, &canvas, mask, threshold),
        PostprocessType::Blend => match blend {
            BlendType::Poisson => {
                let region: Vec<bool> = mask.as_raw().iter().map(|&v| v > threshold).collect();
                seamless_clone(
                    original,
                    &canvas,
                    &region,
                    options.poisson_max_iterations,
                    options.poisson_tolerance,
                )
            }
            BlendType::Linear => mix(original, &canvas, &weights_from_mask(mask)),
            BlendType::Gaussian => mix(
                original,
                &canvas,
                &gaussian_blur(&weights_from_mask(mask), options.gaussian_sigma),
            ),
            BlendType::Smooth => mix(
                original,
                &canvas,
                &convolve(&weights_from_mask(mask), &SMOOTH),
            ),
            BlendType::Smoother => mix(
                original,
                &canvas,
                &convolve(&weights_from_mask(mask), &SMOOTHER),
            ),
            // Rejected by Policies::validate above.
            BlendType::None => canvas,
        },
    };

    tracing::debug!(
        %postprocess,
        %blend,
        bbox = %mapping.bbox,
        width = result.width(),
        height = result.height(),
        "Composited model output"
    );

    Ok(result)
}

/// Resize the model output to the mapped box and lay it over the original.
fn place_patch(
    original: &RgbImage,
    model_output: &RgbImage,
    mapping: &RegionMapping,
) -> RgbImage {
    let bbox = mapping.bbox;
    let patch = resize_image(model_output, bbox.width(), bbox.height());
    if bbox.is_full(mapping.source_width, mapping.source_height) {
        return patch;
    }

    let mut canvas = original.clone();
    imageops::replace(&mut canvas, &patch, bbox.left as i64, bbox.top as i64);
    canvas
}

/// Hard cut: masked pixels from `patch`, everything else from `original`.
fn direct_replace(
    original: &RgbImage,
    patch: &RgbImage,
    mask: &GrayImage,
    threshold: u8,
) -> RgbImage {
    RgbImage::from_fn(original.width(), original.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > threshold {
            *patch.get_pixel(x, y)
        } else {
            *original.get_pixel(x, y)
        }
    })
}

/// Per-pixel convex combination `w * patch + (1 - w) * original`.
fn mix(original: &RgbImage, patch: &RgbImage, weights: &WeightMap) -> RgbImage {
    RgbImage::from_fn(original.width(), original.height(), |x, y| {
        let w = weights.get_pixel(x, y).0[0];
        let o = original.get_pixel(x, y).0;
        let p = patch.get_pixel(x, y).0;
        let channel = |c: usize| {
            let value = w * p[c] as f32 + (1.0 - w) * o[c] as f32;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb([channel(0), channel(1), channel(2)])
    })
}

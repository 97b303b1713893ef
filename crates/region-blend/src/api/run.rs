//! The composed prepare → generate → composite call.

use image::{GrayImage, RgbImage};

use crate::composite::{composite_with_options, BlendOptions};
use crate::geometry::{has_masked_pixels, GeometryError};
use crate::policy::{Policies, PostprocessType};
use crate::region::prepare_with_threshold;

use super::RegionError;

/// Failure of a composed [`run`].
///
/// Keeps the generator's own error type so callers can inspect it.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E> {
    /// Preparing or compositing the region failed.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// The generation step failed.
    #[error("generation failed: {0}")]
    Generation(E),
}

/// Reject inputs that would fail after the generation call.
///
/// Covers bad policies or options and an empty mask under a postprocess
/// that needs one, whatever the preprocess policy.
pub(crate) fn check_inputs(
    policies: &Policies,
    options: &BlendOptions,
    mask: &GrayImage,
) -> Result<(), RegionError> {
    policies.validate()?;
    options.validate()?;
    if policies.postprocess != PostprocessType::None
        && !has_masked_pixels(mask, options.mask_threshold)
    {
        return Err(GeometryError::EmptyMask {
            threshold: options.mask_threshold,
        }
        .into());
    }
    Ok(())
}

/// Prepare a region, hand it to `generate`, and composite the result.
///
/// `generate` receives the region image and mask at exactly
/// `target_width x target_height` and must return an image of the same
/// size; anything else is a [`RegionError::ContractViolation`].
///
/// # Example
///
/// ```
/// use image::{GrayImage, Luma, Rgb, RgbImage};
/// use region_blend::{run, Policies};
///
/// let image = RgbImage::from_pixel(64, 64, Rgb([10, 20, 30]));
/// let mask = GrayImage::from_fn(64, 64, |x, y| Luma([if x < 16 && y < 16 { 255 } else { 0 }]));
///
/// let result = run(&image, &mask, &Policies::default(), 32, 32, |region, _mask| {
///     Ok::<_, std::convert::Infallible>(RgbImage::from_pixel(
///         region.width(),
///         region.height(),
///         Rgb([200, 0, 0]),
///     ))
/// })
/// .unwrap();
///
/// assert_eq!(result.dimensions(), (64, 64));
/// assert_eq!(*result.get_pixel(63, 63), Rgb([10, 20, 30]));
/// ```
pub fn run<F, E>(
    image: &RgbImage,
    mask: &GrayImage,
    policies: &Policies,
    target_width: u32,
    target_height: u32,
    generate: F,
) -> Result<RgbImage, RunError<E>>
where
    F: FnOnce(&RgbImage, &GrayImage) -> Result<RgbImage, E>,
{
    run_with_options(
        image,
        mask,
        policies,
        target_width,
        target_height,
        &BlendOptions::default(),
        generate,
    )
}

/// [`run`] with explicit [`BlendOptions`].
pub fn run_with_options<F, E>(
    image: &RgbImage,
    mask: &GrayImage,
    policies: &Policies,
    target_width: u32,
    target_height: u32,
    options: &BlendOptions,
    generate: F,
) -> Result<RgbImage, RunError<E>>
where
    F: FnOnce(&RgbImage, &GrayImage) -> Result<RgbImage, E>,
{
    check_inputs(policies, options, mask)?;

    let region = prepare_with_threshold(
        image,
        mask,
        policies.preprocess,
        target_width,
        target_height,
        options.mask_threshold,
    )?;

    let output = generate(&region.image, &region.mask).map_err(RunError::Generation)?;
    if output.dimensions() != region.mapping.target_dimensions() {
        return Err(
            RegionError::contract_violation(region.mapping.target_dimensions(), output.dimensions())
                .into(),
        );
    }

    Ok(composite_with_options(
        image,
        mask,
        &output,
        region.mapping,
        policies.postprocess,
        policies.blend,
        options,
    )?)
}

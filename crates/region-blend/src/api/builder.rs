//! RegionBlender builder -- the primary ergonomic entry point for the crate.
//!
//! [`RegionBlender`] bundles the model input size, the policy selection, and
//! the blend options so one value can prepare regions and composite model
//! outputs for many images.

use image::{GrayImage, RgbImage};

use crate::composite::{composite_with_options, BlendOptions};
use crate::policy::{BlendType, Policies, PostprocessType, PreprocessType};
use crate::region::{prepare_with_threshold, PreparedRegion, RegionMapping};

use super::run::{check_inputs, run_with_options, RunError};
use super::RegionError;

/// High-level prepare/composite builder for a fixed-size model.
///
/// # Design
///
/// - Constructor requires the model input size
/// - Configuration methods consume and return `self`
/// - [`prepare()`](Self::prepare) and [`composite()`](Self::composite) take
///   `&self`, so one blender serves any number of images and can be shared
///   between threads
///
/// # Example
///
/// ```
/// use image::{GrayImage, Luma, Rgb, RgbImage};
/// use region_blend::{BlendType, PostprocessType, RegionBlender};
///
/// let blender = RegionBlender::new(128, 128)
///     .postprocess(PostprocessType::Blend)
///     .blend(BlendType::Linear);
///
/// let image = RgbImage::from_pixel(256, 256, Rgb([40, 40, 40]));
/// let mask = GrayImage::from_fn(256, 256, |x, y| {
///     Luma([if (100..140).contains(&x) && (60..200).contains(&y) { 255 } else { 0 }])
/// });
///
/// let region = blender.prepare(&image, &mask).unwrap();
/// assert_eq!(region.image.dimensions(), (128, 128));
///
/// let output = RgbImage::from_pixel(128, 128, Rgb([220, 30, 30]));
/// let result = blender.composite(&image, &mask, &output, region.mapping).unwrap();
/// assert_eq!(*result.get_pixel(120, 100), Rgb([220, 30, 30]));
/// assert_eq!(*result.get_pixel(0, 0), Rgb([40, 40, 40]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBlender {
    target_width: u32,
    target_height: u32,
    policies: Policies,
    options: BlendOptions,
}

impl RegionBlender {
    /// Create a blender for a model taking `target_width x target_height`
    /// inputs.
    ///
    /// Policies default to crop-and-resize with Gaussian blending.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            policies: Policies::default(),
            options: BlendOptions::default(),
        }
    }

    /// Set the preprocess policy.
    #[inline]
    pub fn preprocess(mut self, preprocess: PreprocessType) -> Self {
        self.policies.preprocess = preprocess;
        self
    }

    /// Set the postprocess policy.
    #[inline]
    pub fn postprocess(mut self, postprocess: PostprocessType) -> Self {
        self.policies.postprocess = postprocess;
        self
    }

    /// Set the blend variant used by [`PostprocessType::Blend`].
    #[inline]
    pub fn blend(mut self, blend: BlendType) -> Self {
        self.policies.blend = blend;
        self
    }

    /// Replace all three policies at once.
    #[inline]
    pub fn policies(mut self, policies: Policies) -> Self {
        self.policies = policies;
        self
    }

    /// Replace the blend options.
    #[inline]
    pub fn options(mut self, options: BlendOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the mask threshold used for box detection and hard cuts.
    #[inline]
    pub fn mask_threshold(mut self, threshold: u8) -> Self {
        self.options = self.options.mask_threshold(threshold);
        self
    }

    /// Model input dimensions as `(width, height)`.
    #[inline]
    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    #[inline]
    pub fn policies_ref(&self) -> &Policies {
        &self.policies
    }

    #[inline]
    pub fn options_ref(&self) -> &BlendOptions {
        &self.options
    }

    /// Check the policy selection and options without touching any pixels.
    pub fn validate(&self) -> Result<(), RegionError> {
        self.policies.validate()?;
        self.options.validate()?;
        Ok(())
    }

    /// Check everything that can be rejected before a generation call:
    /// policies, options, and a mask with nothing to replace.
    pub fn check_inputs(&self, mask: &GrayImage) -> Result<(), RegionError> {
        check_inputs(&self.policies, &self.options, mask)
    }

    /// Extract the model input region from `image` and `mask`.
    pub fn prepare(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
    ) -> Result<PreparedRegion, RegionError> {
        prepare_with_threshold(
            image,
            mask,
            self.policies.preprocess,
            self.target_width,
            self.target_height,
            self.options.mask_threshold,
        )
    }

    /// Put `model_output` back into `original` under the configured
    /// postprocess policy.
    pub fn composite(
        &self,
        original: &RgbImage,
        mask: &GrayImage,
        model_output: &RgbImage,
        mapping: RegionMapping,
    ) -> Result<RgbImage, RegionError> {
        composite_with_options(
            original,
            mask,
            model_output,
            mapping,
            self.policies.postprocess,
            self.policies.blend,
            &self.options,
        )
    }

    /// Prepare, call `generate`, and composite in one step.
    pub fn run<F, E>(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        generate: F,
    ) -> Result<RgbImage, RunError<E>>
    where
        F: FnOnce(&RgbImage, &GrayImage) -> Result<RgbImage, E>,
    {
        run_with_options(
            image,
            mask,
            &self.policies,
            self.target_width,
            self.target_height,
            &self.options,
            generate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, GeometryError};
    use crate::policy::PolicyError;
    use image::{Luma, Rgb};
    use pretty_assertions::assert_eq;

    fn bar_mask(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = (10..20).contains(&x) && (5..45).contains(&y);
            Luma([if inside { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_new_defaults() {
        let blender = RegionBlender::new(512, 512);
        assert_eq!(blender.target_dimensions(), (512, 512));
        assert_eq!(*blender.policies_ref(), Policies::default());
        assert_eq!(*blender.options_ref(), BlendOptions::default());
    }

    #[test]
    fn test_builder_chaining() {
        let blender = RegionBlender::new(64, 32)
            .preprocess(PreprocessType::Resize)
            .postprocess(PostprocessType::DirectReplace)
            .blend(BlendType::Poisson)
            .mask_threshold(127);

        assert_eq!(
            *blender.policies_ref(),
            Policies::new(
                PreprocessType::Resize,
                PostprocessType::DirectReplace,
                BlendType::Poisson
            )
        );
        assert_eq!(blender.options_ref().mask_threshold, 127);
        // Other options unchanged
        assert_eq!(blender.options_ref().poisson_max_iterations, 2000);
    }

    #[test]
    fn test_validate_reports_policy_errors() {
        let blender = RegionBlender::new(64, 64)
            .postprocess(PostprocessType::Blend)
            .blend(BlendType::None);
        assert_eq!(
            blender.validate(),
            Err(RegionError::Policy(PolicyError::MissingBlendType))
        );
    }

    #[test]
    fn test_check_inputs_rejects_empty_mask_for_whole_image_policies() {
        let empty = GrayImage::new(32, 32);
        let blender = RegionBlender::new(16, 16)
            .preprocess(PreprocessType::Resize)
            .postprocess(PostprocessType::DirectReplace)
            .blend(BlendType::None);

        // Whole-image preparation accepts the empty mask on its own.
        assert!(blender.prepare(&RgbImage::new(32, 32), &empty).is_ok());
        let expected = RegionError::Geometry(GeometryError::EmptyMask { threshold: 0 });
        assert_eq!(blender.check_inputs(&empty), Err(expected));
    }

    #[test]
    fn test_check_inputs_allows_empty_mask_without_postprocess() {
        let blender = RegionBlender::new(16, 16)
            .preprocess(PreprocessType::None)
            .postprocess(PostprocessType::None)
            .blend(BlendType::None);
        assert_eq!(blender.check_inputs(&GrayImage::new(32, 32)), Ok(()));
    }

    #[test]
    fn test_prepare_uses_configured_size() {
        let blender = RegionBlender::new(40, 20);
        let image = RgbImage::new(60, 60);
        let region = blender.prepare(&image, &bar_mask(60, 60)).unwrap();
        assert_eq!(region.image.dimensions(), (40, 20));
        assert_eq!(region.mapping.target_dimensions(), (40, 20));
    }

    #[test]
    fn test_blender_reusable() {
        let blender = RegionBlender::new(32, 32).blend(BlendType::Smooth);
        let image = RgbImage::from_fn(50, 50, |x, y| Rgb([x as u8 * 5, y as u8 * 5, 0]));
        let mask = bar_mask(50, 50);
        let generate = |region: &RgbImage, _: &GrayImage| {
            let (width, height) = region.dimensions();
            Ok::<_, String>(RgbImage::from_pixel(width, height, Rgb([0, 0, 255])))
        };

        let first = blender.run(&image, &mask, generate).unwrap();
        let second = blender.run(&image, &mask, generate).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mask_threshold_applies_to_prepare() {
        let image = RgbImage::new(100, 100);
        let mut mask = bar_mask(100, 100);
        mask.put_pixel(0, 0, Luma([10]));

        let loose = RegionBlender::new(16, 16).prepare(&image, &mask).unwrap();
        let strict = RegionBlender::new(16, 16)
            .mask_threshold(50)
            .prepare(&image, &mask)
            .unwrap();
        assert_eq!(loose.mapping.bbox, BoundingBox::new(0, 0, 45, 45));
        assert_eq!(strict.mapping.bbox, BoundingBox::new(0, 5, 40, 45));
    }
}

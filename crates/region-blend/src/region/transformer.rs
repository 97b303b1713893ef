//! Model-input preparation and the mapping back to source coordinates.

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::api::RegionError;
use crate::geometry::{
    adjust_to_aspect_ratio, compute_bounding_box_with_threshold, BoundingBox, GeometryError,
    DEFAULT_MASK_THRESHOLD,
};
use crate::policy::{PolicyError, PreprocessType};

use super::resize::{crop_image, crop_mask, resize_image, resize_mask};

/// Record tying a prepared region back to its source image.
///
/// Produced by [`prepare`] and consumed by
/// [`composite`](crate::composite::composite). It is a plain value: it can
/// be serialized, stored next to a queued generation job, and handed to the
/// compositor later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMapping {
    /// Region of the source image the model input was taken from.
    pub bbox: BoundingBox,
    /// Source image width.
    pub source_width: u32,
    /// Source image height.
    pub source_height: u32,
    /// Model input width.
    pub target_width: u32,
    /// Model input height.
    pub target_height: u32,
    /// Policy that produced the region.
    pub preprocess: PreprocessType,
}

impl RegionMapping {
    /// Model input dimensions as `(width, height)`.
    #[inline]
    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    /// Source image dimensions as `(width, height)`.
    #[inline]
    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    /// Check that the mapping can be applied to an image of `dimensions`.
    pub fn validate_against(&self, dimensions: (u32, u32)) -> Result<(), GeometryError> {
        if dimensions != self.source_dimensions() {
            return Err(GeometryError::MappingMismatch {
                expected_width: self.source_width,
                expected_height: self.source_height,
                actual_width: dimensions.0,
                actual_height: dimensions.1,
            });
        }
        self.bbox.validate(self.source_width, self.source_height)
    }
}

/// Model-ready image and mask plus the mapping needed to undo the transform.
#[derive(Debug, Clone)]
pub struct PreparedRegion {
    /// Region image at exactly the target dimensions.
    pub image: RgbImage,
    /// Region mask at exactly the target dimensions.
    pub mask: GrayImage,
    /// Inverse mapping for the compositor.
    pub mapping: RegionMapping,
}

/// Derive the model input from `image` and `mask` under `policy`.
///
/// - [`PreprocessType::None`] / [`PreprocessType::Resize`]: the whole image
///   and mask are resized to the target dimensions.
/// - [`PreprocessType::CropAndResize`]: the mask box is adapted to the
///   target aspect ratio, cropped, and resized.
///
/// # Errors
///
/// - [`PolicyError::ZeroTarget`] for a zero target side
/// - [`GeometryError::DimensionMismatch`] if mask and image differ in size
/// - [`GeometryError::EmptyMask`] when cropping around an empty mask
///
/// # Example
///
/// ```
/// use image::{GrayImage, Luma, RgbImage};
/// use region_blend::{prepare, BoundingBox, PreprocessType};
///
/// let image = RgbImage::new(512, 512);
/// let mask = GrayImage::from_fn(512, 512, |x, y| {
///     Luma([if (200..300).contains(&x) && (200..250).contains(&y) { 255 } else { 0 }])
/// });
///
/// let region = prepare(&image, &mask, PreprocessType::CropAndResize, 256, 256).unwrap();
/// assert_eq!(region.image.dimensions(), (256, 256));
/// assert_eq!(region.mapping.bbox, BoundingBox::new(200, 175, 300, 275));
/// ```
pub fn prepare(
    image: &RgbImage,
    mask: &GrayImage,
    policy: PreprocessType,
    target_width: u32,
    target_height: u32,
) -> Result<PreparedRegion, RegionError> {
    prepare_with_threshold(
        image,
        mask,
        policy,
        target_width,
        target_height,
        DEFAULT_MASK_THRESHOLD,
    )
}

/// [`prepare`] with an explicit masking threshold for the bounding box scan.
pub fn prepare_with_threshold(
    image: &RgbImage,
    mask: &GrayImage,
    policy: PreprocessType,
    target_width: u32,
    target_height: u32,
    mask_threshold: u8,
) -> Result<PreparedRegion, RegionError> {
    if target_width == 0 || target_height == 0 {
        return Err(PolicyError::ZeroTarget {
            width: target_width,
            height: target_height,
        }
        .into());
    }
    if image.dimensions() != mask.dimensions() {
        let err = GeometryError::dimension_mismatch(image.dimensions(), mask.dimensions());
        return Err(err.into());
    }

    let (width, height) = image.dimensions();
    let bbox = match policy {
        PreprocessType::None | PreprocessType::Resize => BoundingBox::full(width, height),
        PreprocessType::CropAndResize => {
            let extent = compute_bounding_box_with_threshold(mask, mask_threshold)?;
            adjust_to_aspect_ratio(extent, target_width, target_height, width, height)?
        }
    };
    bbox.validate(width, height)?;

    let (region_image, region_mask) = if bbox.is_full(width, height) {
        (
            resize_image(image, target_width, target_height),
            resize_mask(mask, target_width, target_height),
        )
    } else {
        (
            resize_image(&crop_image(image, &bbox), target_width, target_height),
            resize_mask(&crop_mask(mask, &bbox), target_width, target_height),
        )
    };

    tracing::debug!(
        %policy,
        %bbox,
        source_width = width,
        source_height = height,
        target_width,
        target_height,
        "Prepared model input region"
    );

    Ok(PreparedRegion {
        image: region_image,
        mask: region_mask,
        mapping: RegionMapping {
            bbox,
            source_width: width,
            source_height: height,
            target_width,
            target_height,
            preprocess: policy,
        },
    })
}

//! Error type for geometric validation.

use super::BoundingBox;

/// Error raised when masks, images, boxes, or mappings disagree spatially.
///
/// Geometry errors are never downgraded: the compositor fails rather than
/// truncating or padding anything to make sizes line up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// No mask pixel exceeds the masking threshold.
    #[error("mask has no pixels above threshold {threshold}")]
    EmptyMask { threshold: u8 },

    /// Mask and image are not the same size.
    #[error("mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    DimensionMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    /// Box has zero width or height.
    #[error("degenerate bounding box {0}")]
    DegenerateBox(BoundingBox),

    /// Target aspect ratio with a zero side.
    #[error("aspect ratio {width}:{height} has a zero side")]
    DegenerateRatio { width: u32, height: u32 },

    /// Box reaches outside the image it refers to.
    #[error("bounding box {bbox} exceeds {width}x{height} image")]
    BoxOutOfBounds {
        bbox: BoundingBox,
        width: u32,
        height: u32,
    },

    /// A region mapping is applied to an image of a different size than
    /// the one it was recorded for.
    #[error(
        "region mapping was recorded for a {expected_width}x{expected_height} image, \
         got {actual_width}x{actual_height}"
    )]
    MappingMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

impl GeometryError {
    pub(crate) fn dimension_mismatch(image: (u32, u32), mask: (u32, u32)) -> Self {
        GeometryError::DimensionMismatch {
            image_width: image.0,
            image_height: image.1,
            mask_width: mask.0,
            mask_height: mask.1,
        }
    }
}

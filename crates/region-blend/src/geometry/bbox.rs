//! Axis-aligned boxes and mask extent scanning.

use std::fmt;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::GeometryError;

/// Mask values strictly above this count as masked unless a caller
/// chooses another threshold.
pub const DEFAULT_MASK_THRESHOLD: u8 = 0;

/// Rectangular region of an image, right/bottom exclusive.
///
/// A valid box for a `width x height` image satisfies
/// `left < right <= width` and `top < bottom <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    #[inline]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box covering an entire `width x height` image.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Box of the given size with its top-left corner at `(left, top)`.
    #[inline]
    pub const fn from_origin(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether `(x, y)` lies inside the box.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Whether the box fits inside a `width x height` image.
    #[inline]
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }

    /// Whether this box covers the whole `width x height` image.
    #[inline]
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }

    /// Check the box invariant against an image size.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), GeometryError> {
        if self.is_empty() {
            return Err(GeometryError::DegenerateBox(*self));
        }
        if !self.is_within(width, height) {
            return Err(GeometryError::BoxOutOfBounds {
                bbox: *self,
                width,
                height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Minimal box enclosing every mask pixel above [`DEFAULT_MASK_THRESHOLD`].
///
/// # Errors
///
/// [`GeometryError::EmptyMask`] if no pixel is masked.
///
/// # Example
///
/// ```
/// use image::{GrayImage, Luma};
/// use region_blend::{compute_bounding_box, BoundingBox};
///
/// let mut mask = GrayImage::new(8, 8);
/// mask.put_pixel(2, 3, Luma([255]));
/// mask.put_pixel(5, 4, Luma([255]));
///
/// assert_eq!(compute_bounding_box(&mask).unwrap(), BoundingBox::new(2, 3, 6, 5));
/// ```
pub fn compute_bounding_box(mask: &GrayImage) -> Result<BoundingBox, GeometryError> {
    compute_bounding_box_with_threshold(mask, DEFAULT_MASK_THRESHOLD)
}

/// Minimal box enclosing every mask pixel strictly above `threshold`.
pub fn compute_bounding_box_with_threshold(
    mask: &GrayImage,
    threshold: u8,
) -> Result<BoundingBox, GeometryError> {
    let (width, height) = mask.dimensions();

    let mut left = u32::MAX;
    let mut top = u32::MAX;
    let mut right = 0u32;
    let mut bottom = 0u32;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] > threshold {
            left = left.min(x);
            top = top.min(y);
            right = right.max(x + 1);
            bottom = bottom.max(y + 1);
        }
    }

    if left == u32::MAX {
        return Err(GeometryError::EmptyMask { threshold });
    }

    let bbox = BoundingBox::new(left, top, right, bottom);
    debug_assert!(bbox.is_within(width, height));
    tracing::trace!(%bbox, width, height, threshold, "Computed mask bounding box");
    Ok(bbox)
}

/// Whether any mask pixel is strictly above `threshold`.
pub fn has_masked_pixels(mask: &GrayImage, threshold: u8) -> bool {
    mask.pixels().any(|p| p.0[0] > threshold)
}

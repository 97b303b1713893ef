//! Geometry engine: mask extents and aspect-ratio adaptation.
//!
//! Pure integer geometry over image coordinates. Nothing here touches pixel
//! values except [`compute_bounding_box`], which only reads the mask.

mod aspect;
mod bbox;
mod error;

pub use aspect::adjust_to_aspect_ratio;
pub use bbox::{
    compute_bounding_box, compute_bounding_box_with_threshold, has_masked_pixels, BoundingBox,
    DEFAULT_MASK_THRESHOLD,
};
pub use error::GeometryError;

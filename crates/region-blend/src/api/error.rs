//! Unified error type for the region-blend public API.
//!
//! [`RegionError`] wraps the geometry and policy errors into a single enum
//! for convenient `?` propagation, and adds the one error that can only be
//! detected at the boundary with the generation model.

use crate::geometry::GeometryError;
use crate::policy::PolicyError;

/// Unified error type for region preparation and compositing.
///
/// # Example
///
/// ```
/// use image::GrayImage;
/// use region_blend::{compute_bounding_box, BoundingBox, RegionError};
///
/// fn mask_extent(mask: &GrayImage) -> Result<BoundingBox, RegionError> {
///     Ok(compute_bounding_box(mask)?)
/// }
///
/// assert!(matches!(
///     mask_extent(&GrayImage::new(4, 4)),
///     Err(RegionError::Geometry(_))
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// Empty mask, mismatched sizes, or a box outside the image.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Unknown or inconsistent policy selection.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The generation model returned an image of the wrong size.
    ///
    /// Never repaired by cropping or padding: a misshapen output is a bug
    /// in the model integration.
    #[error(
        "model output is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    ContractViolation {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

impl RegionError {
    pub(crate) fn contract_violation(expected: (u32, u32), actual: (u32, u32)) -> Self {
        RegionError::ContractViolation {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_geometry_error() {
        let error: RegionError = GeometryError::EmptyMask { threshold: 0 }.into();
        assert_eq!(
            error.to_string(),
            "geometry error: mask has no pixels above threshold 0"
        );
    }

    #[test]
    fn test_from_policy_error() {
        let error: RegionError = PolicyError::MissingBlendType.into();
        assert!(matches!(error, RegionError::Policy(_)));
    }

    #[test]
    fn test_contract_violation_message() {
        let error = RegionError::contract_violation((512, 512), (512, 256));
        assert_eq!(
            error.to_string(),
            "model output is 512x256, expected 512x512"
        );
    }
}

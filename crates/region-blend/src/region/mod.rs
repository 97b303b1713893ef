//! Region transformer: turn an image and mask into model input.
//!
//! [`prepare`] picks the working region according to a [`PreprocessType`]
//! and resizes it to the model's fixed input size. The returned
//! [`RegionMapping`] records where the region came from so the compositor
//! can put the model output back.
//!
//! [`PreprocessType`]: crate::PreprocessType

mod resize;
mod transformer;

pub use resize::{crop_image, crop_mask, resize_image, resize_mask, IMAGE_FILTER, MASK_FILTER};
pub use transformer::{prepare, prepare_with_threshold, PreparedRegion, RegionMapping};

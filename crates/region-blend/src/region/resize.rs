//! Fixed resampling kernels for images and masks.
//!
//! Images are resampled bilinearly, masks with nearest neighbour so a binary
//! mask stays binary after any number of resizes. Both kernels are
//! deterministic: identical inputs give bit-identical outputs.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::geometry::BoundingBox;

/// Resampling filter for color images (bilinear).
pub const IMAGE_FILTER: FilterType = FilterType::Triangle;

/// Resampling filter for masks (nearest neighbour).
pub const MASK_FILTER: FilterType = FilterType::Nearest;

/// Resize a color image with [`IMAGE_FILTER`].
///
/// Resizing to the current dimensions returns an exact copy.
pub fn resize_image(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, IMAGE_FILTER)
}

/// Resize a mask with [`MASK_FILTER`].
///
/// Resizing to the current dimensions returns an exact copy.
pub fn resize_mask(mask: &GrayImage, width: u32, height: u32) -> GrayImage {
    if mask.dimensions() == (width, height) {
        return mask.clone();
    }
    imageops::resize(mask, width, height, MASK_FILTER)
}

/// Copy the pixels of `bbox` out of `image`.
///
/// The caller guarantees `bbox` lies inside `image`.
pub fn crop_image(image: &RgbImage, bbox: &BoundingBox) -> RgbImage {
    imageops::crop_imm(image, bbox.left, bbox.top, bbox.width(), bbox.height()).to_image()
}

/// Copy the pixels of `bbox` out of `mask`.
///
/// The caller guarantees `bbox` lies inside `mask`.
pub fn crop_mask(mask: &GrayImage, bbox: &BoundingBox) -> GrayImage {
    imageops::crop_imm(mask, bbox.left, bbox.top, bbox.width(), bbox.height()).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) * 2) as u8])
        })
    }

    #[test]
    fn test_resize_noop_same_dimensions() {
        let input = gradient(40, 30);
        let output = resize_image(&input, 40, 30);
        assert_eq!(output, input, "Pixels should be unchanged for no-op resize");
    }

    #[test]
    fn test_resize_solid_color_stays_solid() {
        let input = RgbImage::from_pixel(37, 23, Rgb([12, 200, 99]));
        let output = resize_image(&input, 64, 64);
        assert_eq!(output.dimensions(), (64, 64));
        assert!(output.pixels().all(|p| *p == Rgb([12, 200, 99])));
    }

    #[test]
    fn test_resize_is_deterministic() {
        let input = gradient(50, 33);
        assert_eq!(resize_image(&input, 17, 29), resize_image(&input, 17, 29));
    }

    #[test]
    fn test_mask_resize_stays_binary() {
        let mask = GrayImage::from_fn(30, 30, |x, y| {
            if (10..20).contains(&x) && (5..25).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        for (w, h) in [(7, 7), (64, 48), (256, 256)] {
            let resized = resize_mask(&mask, w, h);
            assert_eq!(resized.dimensions(), (w, h));
            assert!(
                resized.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255),
                "nearest-neighbour mask must stay binary at {w}x{h}"
            );
        }
    }

    #[test]
    fn test_crop_copies_region() {
        let image = gradient(20, 20);
        let bbox = BoundingBox::new(3, 4, 9, 15);
        let cropped = crop_image(&image, &bbox);
        assert_eq!(cropped.dimensions(), (6, 11));
        assert_eq!(cropped.get_pixel(0, 0), image.get_pixel(3, 4));
        assert_eq!(cropped.get_pixel(5, 10), image.get_pixel(8, 14));
    }

    #[test]
    fn test_crop_mask_copies_region() {
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(6, 7, Luma([255]));
        let cropped = crop_mask(&mask, &BoundingBox::new(5, 5, 10, 10));
        assert_eq!(cropped.get_pixel(1, 2).0[0], 255);
        assert_eq!(cropped.get_pixel(0, 0).0[0], 0);
    }
}

//! Assertion helpers for tests.

use image::RgbImage;
use inpaint_pipeline::region_blend::BoundingBox;
use pretty_assertions::assert_eq;

/// Assert every pixel outside `region` equals the original
pub fn assert_unchanged_outside(original: &RgbImage, result: &RgbImage, region: &BoundingBox) {
    assert_eq!(original.dimensions(), result.dimensions());
    let changed: Vec<(u32, u32)> = result
        .enumerate_pixels()
        .filter(|(x, y, _)| !region.contains(*x, *y))
        .filter(|(x, y, p)| *p != original.get_pixel(*x, *y))
        .map(|(x, y, _)| (x, y))
        .take(5)
        .collect();
    assert!(
        changed.is_empty(),
        "Pixels outside {region} changed, first few: {changed:?}"
    );
}

/// Assert at least one pixel inside `region` differs from the original
pub fn assert_changed_inside(original: &RgbImage, result: &RgbImage, region: &BoundingBox) {
    let changed = result
        .enumerate_pixels()
        .filter(|(x, y, _)| region.contains(*x, *y))
        .filter(|(x, y, p)| *p != original.get_pixel(*x, *y))
        .count();
    assert!(changed > 0, "No pixel inside {region} changed");
}

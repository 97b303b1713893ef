//! Aspect-ratio adaptation of mask boxes.
//!
//! A mask box rarely has the model's aspect ratio. Cropping it directly and
//! resizing would distort the content, so the box is first grown along its
//! short side until it matches `target_width : target_height`.
//!
//! # Placement rules
//!
//! 1. Grow the short side to `ceil(long * ratio)`; the long side is kept.
//! 2. Centre the grown box on the original box. When the growth is odd the
//!    extra pixel goes right (or down).
//! 3. Shift the box back inside the image if it overhangs an edge. The box
//!    is moved, never clipped, so it keeps its size and still contains the
//!    original box.
//! 4. If the grown box is larger than the image, use the largest box of the
//!    target ratio that fits (`floor` rounding), centred on the original box
//!    and shifted inside the image like in step 3.
//!
//! Because sizes are integers the ratio is exact only up to one pixel of
//! rounding on the adjusted side. For small boxes that pixel is a large
//! share: a 1x1 box at 16:9 becomes 2x1.

use super::{BoundingBox, GeometryError};

/// Grow `bbox` to the `target_width : target_height` aspect ratio while
/// keeping it inside a `image_width x image_height` image.
///
/// # Errors
///
/// - [`GeometryError::DegenerateRatio`] if either target side is zero
/// - [`GeometryError::DegenerateBox`] if `bbox` is empty
/// - [`GeometryError::BoxOutOfBounds`] if `bbox` already exceeds the image
///
/// # Example
///
/// ```
/// use region_blend::{adjust_to_aspect_ratio, BoundingBox};
///
/// // 100x50 box, square target: grows vertically around its centre.
/// let bbox = BoundingBox::new(200, 200, 300, 250);
/// let adjusted = adjust_to_aspect_ratio(bbox, 256, 256, 512, 512).unwrap();
/// assert_eq!(adjusted, BoundingBox::new(200, 175, 300, 275));
/// ```
pub fn adjust_to_aspect_ratio(
    bbox: BoundingBox,
    target_width: u32,
    target_height: u32,
    image_width: u32,
    image_height: u32,
) -> Result<BoundingBox, GeometryError> {
    if target_width == 0 || target_height == 0 {
        return Err(GeometryError::DegenerateRatio {
            width: target_width,
            height: target_height,
        });
    }
    bbox.validate(image_width, image_height)?;

    let (w, h) = (bbox.width() as u64, bbox.height() as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    let (grown_w, grown_h) = if w * th == h * tw {
        (w, h)
    } else if w * th < h * tw {
        ((h * tw).div_ceil(th), h)
    } else {
        (w, (w * th).div_ceil(tw))
    };

    let fits = grown_w <= image_width as u64 && grown_h <= image_height as u64;
    let (new_w, new_h, fallback) = if fits {
        (grown_w, grown_h, false)
    } else {
        let (fw, fh) = largest_fitting(tw, th, image_width as u64, image_height as u64);
        (fw, fh, true)
    };

    let left = place(bbox.left, w, new_w, image_width);
    let top = place(bbox.top, h, new_h, image_height);
    let adjusted = BoundingBox::from_origin(left, top, new_w as u32, new_h as u32);

    tracing::debug!(
        original = %bbox,
        %adjusted,
        target_width,
        target_height,
        fallback,
        "Adjusted box to aspect ratio"
    );

    Ok(adjusted)
}

/// Largest `tw:th` box that fits inside `width x height`, never below 1x1.
fn largest_fitting(tw: u64, th: u64, width: u64, height: u64) -> (u64, u64) {
    if width * th <= height * tw {
        (width, ((width * th) / tw).max(1))
    } else {
        (((height * tw) / th).max(1), height)
    }
}

/// Start coordinate of a span of `new_len` centred on `[start, start + len)`
/// and shifted inside `[0, limit)`.
fn place(start: u32, len: u64, new_len: u64, limit: u32) -> u32 {
    let growth = new_len as i64 - len as i64;
    let centred = start as i64 - growth.div_euclid(2);
    let max_start = limit as i64 - new_len as i64;
    centred.clamp(0, max_start.max(0)) as u32
}

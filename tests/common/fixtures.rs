//! Test images, masks, and configurations.

use image::{GrayImage, Luma, Rgb, RgbImage};
use inpaint_pipeline::models::{InpaintRequest, InpaintingConfig};
use inpaint_pipeline::region_blend::BoundingBox;

/// The 100x50 mask box used by the 512x512 scenario
pub const SCENARIO_MASK: BoundingBox = BoundingBox::new(206, 231, 306, 281);

/// Smooth colour ramp, distinct in every channel
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
        ])
    })
}

/// Binary mask with `rect` set to 255
pub fn rect_mask(width: u32, height: u32, rect: BoundingBox) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([if rect.contains(x, y) { 255 } else { 0 }])
    })
}

/// 512x512 gradient with the 100x50 scenario mask
pub fn scenario_request() -> InpaintRequest {
    InpaintRequest::new(gradient(512, 512), rect_mask(512, 512, SCENARIO_MASK))
}

/// Small request for batch tests
pub fn small_request(seed: u8) -> InpaintRequest {
    let image = RgbImage::from_pixel(96, 64, Rgb([seed, 100, 200]));
    let mask = rect_mask(96, 64, BoundingBox::new(30, 20, 60, 40));
    InpaintRequest::new(image, mask)
}

/// Default policies at a small model size to keep tests fast
pub fn small_config() -> InpaintingConfig {
    InpaintingConfig {
        width: 64,
        height: 64,
        ..InpaintingConfig::default()
    }
}

/// YAML document exercising every config section
pub const FULL_CONFIG_YAML: &str = r#"
preprocess: crop_and_resize
postprocess: blend
blending: poisson
width: 256
height: 256
num_batches: 2
max_concurrency: 2
blend_options:
  gaussian_sigma: 4.0
  poisson_max_iterations: 500
  poisson_tolerance: 0.001
  mask_threshold: 10
generation:
  prompt: a red armchair
  negative_prompt: blurry
  num_inference_steps: 30
  guidance_scale: 8.0
  strength: 0.9
  seed: 99
"#;

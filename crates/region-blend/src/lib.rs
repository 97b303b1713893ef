#![allow(
    clippy::needless_range_loop,
    clippy::derivable_impls,
    clippy::module_inception
)]

//! region-blend: mask-driven region extraction and seamless compositing
//!
//! Generative inpainting models take a fixed-size image and mask. This crate
//! does the geometry and pixel work around such a model: it cuts a working
//! region out of a full-resolution image, reshapes it to the model's input
//! size, and afterwards merges the model output back into the original
//! without visible seams.
//!
//! # Quick Start
//!
//! The [`RegionBlender`] builder is the primary entry point:
//!
//! ```
//! use image::{GrayImage, Luma, Rgb, RgbImage};
//! use region_blend::{BlendType, RegionBlender};
//!
//! let image = RgbImage::from_pixel(512, 512, Rgb([90, 120, 60]));
//! let mask = GrayImage::from_fn(512, 512, |x, y| {
//!     Luma([if (200..300).contains(&x) && (200..250).contains(&y) { 255 } else { 0 }])
//! });
//!
//! let blender = RegionBlender::new(256, 256).blend(BlendType::Poisson);
//! let result = blender
//!     .run(&image, &mask, |region, _mask| {
//!         // Stand-in for the model call.
//!         Ok::<_, String>(region.clone())
//!     })
//!     .unwrap();
//!
//! assert_eq!(result.dimensions(), (512, 512));
//! ```
//!
//! # Two-step API
//!
//! When the model runs elsewhere (another process, a job queue), split the
//! round trip with [`prepare`] and [`composite`]. The [`RegionMapping`]
//! returned by `prepare` is a plain serializable value that carries
//! everything `composite` needs.
//!
//! ```
//! use image::{GrayImage, Luma, RgbImage};
//! use region_blend::{composite, prepare, BlendType, PostprocessType, PreprocessType};
//!
//! let image = RgbImage::new(300, 200);
//! let mask = GrayImage::from_fn(300, 200, |x, _| Luma([if x > 250 { 255 } else { 0 }]));
//!
//! let region = prepare(&image, &mask, PreprocessType::CropAndResize, 64, 64).unwrap();
//! let output = region.image.clone();
//! let result = composite(
//!     &image,
//!     &mask,
//!     &output,
//!     region.mapping,
//!     PostprocessType::Blend,
//!     BlendType::Gaussian,
//! )
//! .unwrap();
//! assert_eq!(result.dimensions(), (300, 200));
//! ```
//!
//! # Policies
//!
//! | Preprocess | Region given to the model |
//! |------------|---------------------------|
//! | `None`, `Resize` | whole image, resized |
//! | `CropAndResize` | mask box grown to the model's aspect ratio, cropped, resized |
//!
//! | Postprocess | Result |
//! |-------------|--------|
//! | `None` | model output resized to the original size (whole-image policies only) |
//! | `DirectReplace` | masked pixels from the model output, the rest untouched |
//! | `Blend` | mix governed by [`BlendType`] |
//!
//! Blend variants: `Linear` uses the mask value as weight; `Smooth`,
//! `Smoother` and `Gaussian` feather the mask first, in increasing width;
//! `Poisson` solves for an output whose gradients follow the model output
//! inside the mask while matching the original on its boundary.
//!
//! # Resampling
//!
//! Images are resized bilinearly ([`IMAGE_FILTER`]) and masks with nearest
//! neighbour ([`MASK_FILTER`]), so binary masks stay binary and repeated runs
//! are bit-identical.

pub mod api;
pub mod composite;
pub mod geometry;
pub mod policy;
pub mod region;


pub use api::{run, run_with_options, RegionBlender, RegionError, RunError};
pub use composite::{
    composite, composite_with_options, seamless_clone, BlendOptions, MAX_GAUSSIAN_SIGMA,
};
pub use geometry::{
    adjust_to_aspect_ratio, compute_bounding_box, compute_bounding_box_with_threshold,
    has_masked_pixels, BoundingBox, GeometryError, DEFAULT_MASK_THRESHOLD,
};
pub use policy::{BlendType, Policies, PolicyError, PostprocessType, PreprocessType};
pub use region::{
    prepare, prepare_with_threshold, PreparedRegion, RegionMapping, IMAGE_FILTER, MASK_FILTER,
};

//! inpaint-pipeline - batch orchestration around a fixed-size inpainting model.
//!
//! Each request is cut down to the model's input size with
//! [`region_blend`], handed to an [`ImageGenerator`](services::ImageGenerator),
//! and composited back into the full-resolution image. Batches run
//! concurrently and report failures per item.
//!
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;

pub use region_blend;

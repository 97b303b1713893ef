use async_trait::async_trait;
use image::{GrayImage, RgbImage};

use crate::models::GenerationParams;

/// The generative inpainting model, seen from the pipeline.
///
/// `image` and `mask` are always exactly `params.width x params.height`.
/// Implementations must return an image of that same size or fail; the
/// pipeline never crops or pads a misshapen output. Timeouts and retries
/// belong to the implementation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        params: &GenerationParams,
    ) -> anyhow::Result<RgbImage>;
}

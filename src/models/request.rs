use image::{GrayImage, RgbImage};

use super::GenerationParams;

/// One image/mask pair to inpaint.
#[derive(Debug, Clone)]
pub struct InpaintRequest {
    /// Full-resolution source image
    pub image: RgbImage,

    /// Mask congruent to `image`; non-zero marks pixels to regenerate
    pub mask: GrayImage,

    /// Per-request generation parameters; the config defaults when `None`
    pub params: Option<GenerationParams>,
}

impl InpaintRequest {
    pub fn new(image: RgbImage, mask: GrayImage) -> Self {
        Self {
            image,
            mask,
            params: None,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = Some(params);
        self
    }
}

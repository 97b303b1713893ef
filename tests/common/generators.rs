//! Stand-in generation models.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use image::{GrayImage, Rgb, RgbImage};
use inpaint_pipeline::models::GenerationParams;
use inpaint_pipeline::services::ImageGenerator;

/// Returns its input region unchanged.
#[derive(Default)]
pub struct EchoGenerator {
    pub calls: AtomicUsize,
}

impl EchoGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for EchoGenerator {
    async fn generate(
        &self,
        image: &RgbImage,
        _mask: &GrayImage,
        _params: &GenerationParams,
    ) -> anyhow::Result<RgbImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(image.clone())
    }
}

/// Fills the whole region with one colour.
pub struct PaintGenerator(pub [u8; 3]);

#[async_trait]
impl ImageGenerator for PaintGenerator {
    async fn generate(
        &self,
        image: &RgbImage,
        _mask: &GrayImage,
        params: &GenerationParams,
    ) -> anyhow::Result<RgbImage> {
        let (width, height) = (params.width, params.height);
        assert_eq!(image.dimensions(), (width, height));
        Ok(RgbImage::from_pixel(width, height, Rgb(self.0)))
    }
}

/// Fails for requests whose prompt matches `poison`, echoes otherwise.
pub struct FailingGenerator {
    pub poison: String,
}

#[async_trait]
impl ImageGenerator for FailingGenerator {
    async fn generate(
        &self,
        image: &RgbImage,
        _mask: &GrayImage,
        params: &GenerationParams,
    ) -> anyhow::Result<RgbImage> {
        if params.prompt == self.poison {
            bail!("model rejected prompt {:?}", params.prompt);
        }
        Ok(image.clone())
    }
}

/// Panics for requests whose prompt matches `poison`, echoes otherwise.
pub struct PanickingGenerator {
    pub poison: String,
}

#[async_trait]
impl ImageGenerator for PanickingGenerator {
    async fn generate(
        &self,
        image: &RgbImage,
        _mask: &GrayImage,
        params: &GenerationParams,
    ) -> anyhow::Result<RgbImage> {
        if params.prompt == self.poison {
            panic!("generator crashed");
        }
        Ok(image.clone())
    }
}

/// Returns an image one pixel too narrow.
pub struct WrongSizeGenerator;

#[async_trait]
impl ImageGenerator for WrongSizeGenerator {
    async fn generate(
        &self,
        image: &RgbImage,
        _mask: &GrayImage,
        _params: &GenerationParams,
    ) -> anyhow::Result<RgbImage> {
        Ok(RgbImage::new(image.width() - 1, image.height()))
    }
}

/// Echoes after a short delay and records the peak number of calls in flight.
#[derive(Default)]
pub struct SlowGenerator {
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl ImageGenerator for SlowGenerator {
    async fn generate(
        &self,
        image: &RgbImage,
        _mask: &GrayImage,
        _params: &GenerationParams,
    ) -> anyhow::Result<RgbImage> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(image.clone())
    }
}

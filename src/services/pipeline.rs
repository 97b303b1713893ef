use std::sync::Arc;

use image::{GrayImage, RgbImage};
use region_blend::{PreparedRegion, RegionBlender};
use tokio::sync::Semaphore;

use crate::error::{ConfigError, PipelineError};
use crate::models::{GenerationParams, InpaintRequest, InpaintingConfig};
use crate::services::ImageGenerator;

/// Outcome of one batch item, tagged with its input position.
#[derive(Debug)]
pub struct ItemOutcome {
    /// Index of the request in the submitted batch
    pub index: usize,
    /// One composited image per generation batch, or the item's error
    pub result: Result<Vec<RgbImage>, PipelineError>,
}

impl ItemOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item results of [`InpaintPipeline::run_batch`], in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    /// Number of items that produced images.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Failed items with their input index.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &PipelineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.index, e)))
    }

    pub fn into_results(self) -> Vec<Result<Vec<RgbImage>, PipelineError>> {
        self.outcomes.into_iter().map(|o| o.result).collect()
    }
}

/// Prepare → generate → composite, per item and per batch.
///
/// Cheap to clone; clones share the generator and configuration.
#[derive(Clone)]
pub struct InpaintPipeline {
    config: Arc<InpaintingConfig>,
    blender: Arc<RegionBlender>,
    generator: Arc<dyn ImageGenerator>,
}

impl InpaintPipeline {
    pub fn new(
        config: InpaintingConfig,
        generator: Arc<dyn ImageGenerator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let blender = Arc::new(config.blender());
        Ok(Self {
            config: Arc::new(config),
            blender,
            generator,
        })
    }

    pub fn config(&self) -> &InpaintingConfig {
        &self.config
    }

    /// Inpaint one image, returning `num_batches` composited results.
    ///
    /// Inputs are checked before the generator is called. Pixel work runs
    /// on the blocking pool; only the generator call runs on the async
    /// runtime.
    pub async fn process(&self, request: InpaintRequest) -> Result<Vec<RgbImage>, PipelineError> {
        let InpaintRequest {
            image,
            mask,
            params,
        } = request;
        let source = Arc::new((image, mask));

        let region = {
            let blender = self.blender.clone();
            let source = source.clone();
            run_blocking(move || {
                blender.check_inputs(&source.1)?;
                blender.prepare(&source.0, &source.1)
            })
            .await??
        };

        let params = self.resolve_params(params);
        tracing::debug!(
            bbox = %region.mapping.bbox,
            seed = params.seed,
            batches = self.config.num_batches,
            "Prepared inpainting region"
        );

        let mut results = Vec::with_capacity(self.config.num_batches as usize);
        for batch in 0..self.config.num_batches {
            let output = self.generate(&region, &params.for_batch(batch)).await?;

            let blender = self.blender.clone();
            let source = source.clone();
            let mapping = region.mapping;
            let composited = run_blocking(move || {
                blender.composite(&source.0, &source.1, &output, mapping)
            })
            .await??;
            results.push(composited);
        }

        Ok(results)
    }

    /// Process every request, at most `max_concurrency` at a time.
    ///
    /// A failing or panicking item only fails its own outcome.
    pub async fn run_batch(&self, requests: Vec<InpaintRequest>) -> BatchReport {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let total = requests.len();

        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let pipeline = self.clone();
                let semaphore = semaphore.clone();
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| PipelineError::Task(e.to_string()))?;
                    pipeline.process(request).await
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(total);
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PipelineError::Task(format!("item task failed: {e}"))),
            };
            match &result {
                Ok(images) => tracing::info!(index, images = images.len(), "Inpainted batch item"),
                Err(e) => tracing::warn!(index, error = %e, "Batch item failed"),
            }
            outcomes.push(ItemOutcome { index, result });
        }

        let report = BatchReport { outcomes };
        tracing::info!(
            total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        report
    }

    fn resolve_params(&self, params: Option<GenerationParams>) -> GenerationParams {
        let (width, height) = self.blender.target_dimensions();
        params
            .unwrap_or_else(|| self.config.generation.clone())
            .with_size(width, height)
            .resolve_seed()
    }

    async fn generate(
        &self,
        region: &PreparedRegion,
        params: &GenerationParams,
    ) -> Result<RgbImage, PipelineError> {
        let output = self
            .generator
            .generate(&region.image, &region.mask, params)
            .await
            .map_err(PipelineError::Generation)?;

        let expected = region.mapping.target_dimensions();
        if output.dimensions() != expected {
            return Err(PipelineError::ContractViolation {
                expected_width: expected.0,
                expected_height: expected.1,
                actual_width: output.width(),
                actual_height: output.height(),
            });
        }
        Ok(output)
    }
}

/// Run CPU-bound work on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PipelineError::Task(format!("blocking task: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{Luma, Rgb};
    use region_blend::{BlendType, PostprocessType, PreprocessType};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns the region unchanged and records every seed it sees.
    #[derive(Default)]
    struct Recorder {
        seeds: Mutex<Vec<i64>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageGenerator for Recorder {
        async fn generate(
            &self,
            image: &RgbImage,
            _mask: &GrayImage,
            params: &GenerationParams,
        ) -> anyhow::Result<RgbImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut seeds) = self.seeds.lock() {
                seeds.push(params.seed);
            }
            Ok(image.clone())
        }
    }

    fn request() -> InpaintRequest {
        let image = RgbImage::from_fn(64, 48, |x, y| Rgb([x as u8 * 3, y as u8 * 4, 60]));
        let mask = GrayImage::from_fn(64, 48, |x, y| {
            let inside = (20..30).contains(&x) && (10..40).contains(&y);
            Luma([if inside { 255 } else { 0 }])
        });
        InpaintRequest::new(image, mask)
    }

    fn small_config() -> InpaintingConfig {
        InpaintingConfig {
            width: 32,
            height: 32,
            ..InpaintingConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = InpaintingConfig {
            postprocess: PostprocessType::Blend,
            blending: BlendType::None,
            ..InpaintingConfig::default()
        };
        let result = InpaintPipeline::new(config, Arc::new(Recorder::default()));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_process_returns_full_size_image() {
        let pipeline = InpaintPipeline::new(small_config(), Arc::new(Recorder::default())).unwrap();
        let results = pipeline.process(request()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].dimensions(), (64, 48));
    }

    #[tokio::test]
    async fn test_num_batches_calls_generator_per_batch() {
        let recorder = Arc::new(Recorder::default());
        let config = InpaintingConfig {
            num_batches: 3,
            ..small_config()
        };
        let pipeline = InpaintPipeline::new(config, recorder.clone()).unwrap();

        let request = request().with_params(GenerationParams::new("door").with_seed(10));
        let results = pipeline.process(request).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(*recorder.seeds.lock().unwrap(), vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn test_random_seed_resolved_once_per_item() {
        let recorder = Arc::new(Recorder::default());
        let config = InpaintingConfig {
            num_batches: 2,
            ..small_config()
        };
        let pipeline = InpaintPipeline::new(config, recorder.clone()).unwrap();
        pipeline.process(request()).await.unwrap();

        let seeds = recorder.seeds.lock().unwrap().clone();
        assert_eq!(seeds.len(), 2);
        assert!(seeds[0] >= 0);
        assert_eq!(seeds[1], seeds[0] + 1);
    }

    #[tokio::test]
    async fn test_region_error_surfaces_before_generation() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = InpaintPipeline::new(small_config(), recorder.clone()).unwrap();

        let empty = InpaintRequest::new(RgbImage::new(16, 16), GrayImage::new(16, 16));
        let err = pipeline.process(empty).await.unwrap_err();
        assert!(matches!(err, PipelineError::Region(_)));
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_mask_rejected_before_generation_for_resize() {
        let recorder = Arc::new(Recorder::default());
        let config = InpaintingConfig {
            preprocess: PreprocessType::Resize,
            postprocess: PostprocessType::DirectReplace,
            blending: BlendType::None,
            ..small_config()
        };
        let pipeline = InpaintPipeline::new(config, recorder.clone()).unwrap();

        let empty = InpaintRequest::new(RgbImage::new(32, 32), GrayImage::new(32, 32));
        let err = pipeline.process(empty).await.unwrap_err();
        assert!(matches!(err, PipelineError::Region(_)), "{err}");
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whole_image_policy_round_trip() {
        let config = InpaintingConfig {
            preprocess: PreprocessType::Resize,
            postprocess: PostprocessType::None,
            blending: BlendType::None,
            width: 64,
            height: 48,
            ..InpaintingConfig::default()
        };
        let pipeline = InpaintPipeline::new(config, Arc::new(Recorder::default())).unwrap();
        let request = request();
        let original = request.image.clone();

        let results = pipeline.process(request).await.unwrap();
        assert_eq!(results[0], original);
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::default();
        assert!(report.is_empty());
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 0);
    }
}

use serde::{Deserialize, Serialize};

/// Seed value meaning "draw a fresh random seed".
pub const RANDOM_SEED: i64 = -1;

/// Parameters handed to the generation model with every region.
///
/// The pipeline overwrites `width`/`height` with the configured model input
/// size and resolves a [`RANDOM_SEED`] before the first call, so a whole item
/// is generated from one reproducible seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Text prompt. Passed through unvalidated.
    pub prompt: String,

    /// Optional negative prompt.
    pub negative_prompt: Option<String>,

    /// Model input width in pixels
    pub width: u32,

    /// Model input height in pixels
    pub height: u32,

    /// Number of denoising steps
    pub num_inference_steps: u32,

    /// Classifier-free guidance scale
    pub guidance_scale: f32,

    /// Denoising strength in `[0, 1]`
    pub strength: f32,

    /// Seed for the model's noise generator, [`RANDOM_SEED`] for random
    pub seed: i64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: None,
            width: 512,
            height: 512,
            num_inference_steps: 50,
            guidance_scale: 7.5,
            strength: 1.0,
            seed: RANDOM_SEED,
        }
    }
}

impl GenerationParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Whether the seed still has to be drawn.
    pub fn has_random_seed(&self) -> bool {
        self.seed < 0
    }

    /// Replace a negative seed with a freshly drawn one.
    pub fn resolve_seed(mut self) -> Self {
        if self.has_random_seed() {
            self.seed = rand::random::<u32>() as i64;
        }
        self
    }

    /// Parameters for the `batch`-th generation of one item.
    ///
    /// Consecutive batches use consecutive seeds so every output differs
    /// but the sequence is reproducible from the first seed.
    pub fn for_batch(&self, batch: u32) -> Self {
        let mut params = self.clone();
        if !params.has_random_seed() {
            params.seed = params.seed.wrapping_add(batch as i64);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.width, 512);
        assert_eq!(params.height, 512);
        assert_eq!(params.num_inference_steps, 50);
        assert!((params.guidance_scale - 7.5).abs() < f32::EPSILON);
        assert!((params.strength - 1.0).abs() < f32::EPSILON);
        assert_eq!(params.seed, RANDOM_SEED);
        assert!(params.has_random_seed());
    }

    #[test]
    fn test_resolve_seed_draws_non_negative() {
        let params = GenerationParams::new("a cat").resolve_seed();
        assert!(params.seed >= 0);
        assert!(!params.has_random_seed());
        assert_eq!(params.prompt, "a cat");
    }

    #[test]
    fn test_resolve_seed_keeps_fixed_seed() {
        let params = GenerationParams::default().with_seed(42).resolve_seed();
        assert_eq!(params.seed, 42);
    }

    #[test]
    fn test_for_batch_offsets_seed() {
        let params = GenerationParams::default().with_seed(100);
        assert_eq!(params.for_batch(0).seed, 100);
        assert_eq!(params.for_batch(3).seed, 103);
        assert_eq!(params.for_batch(3).prompt, params.prompt);
    }

    #[test]
    fn test_builder_methods() {
        let params = GenerationParams::new("sky")
            .with_negative_prompt("blurry")
            .with_size(768, 512);
        assert_eq!(params.negative_prompt.as_deref(), Some("blurry"));
        assert_eq!((params.width, params.height), (768, 512));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let params: GenerationParams =
            serde_yaml::from_str("prompt: a red door\nseed: 7\n").unwrap();
        assert_eq!(params.prompt, "a red door");
        assert_eq!(params.seed, 7);
        assert_eq!(params.num_inference_steps, 50);
    }
}

use std::path::Path;
use std::str::FromStr;

use region_blend::{
    BlendOptions, BlendType, Policies, PolicyError, PostprocessType, PreprocessType, RegionBlender,
};
use serde::{Deserialize, Deserializer, Serialize};

use super::GenerationParams;
use crate::error::ConfigError;

/// Inpainting configuration loaded from YAML.
///
/// Policy fields accept either the stable integer value or the snake_case
/// name:
///
/// ```yaml
/// preprocess: crop_and_resize   # or 3
/// postprocess: blend
/// blending: poisson
/// width: 512
/// height: 512
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InpaintingConfig {
    /// How the model input region is cut from the source image
    #[serde(deserialize_with = "policy_value")]
    pub preprocess: PreprocessType,

    /// How the model output is merged back
    #[serde(deserialize_with = "policy_value")]
    pub postprocess: PostprocessType,

    /// Blend variant for `postprocess: blend`
    #[serde(deserialize_with = "policy_value")]
    pub blending: BlendType,

    /// Model input width
    pub width: u32,

    /// Model input height
    pub height: u32,

    /// Generator calls per item; each output is composited separately
    pub num_batches: u32,

    /// Items processed at the same time by a batch run
    pub max_concurrency: usize,

    /// Feathering and Poisson solver tuning
    pub blend_options: BlendOptions,

    /// Generation parameters used when a request brings none
    pub generation: GenerationParams,
}

impl Default for InpaintingConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessType::default(),
            postprocess: PostprocessType::default(),
            blending: BlendType::default(),
            width: 512,
            height: 512,
            num_batches: 1,
            max_concurrency: 4,
            blend_options: BlendOptions::default(),
            generation: GenerationParams::default(),
        }
    }
}

impl InpaintingConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;

        tracing::info!(
            path = %path.display(),
            preprocess = %config.preprocess,
            postprocess = %config.postprocess,
            blending = %config.blending,
            width = config.width,
            height = config.height,
            "Loaded inpainting configuration"
        );
        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// The three policies as one value.
    pub fn policies(&self) -> Policies {
        Policies::new(self.preprocess, self.postprocess, self.blending)
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "model size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_batches == 0 {
            return Err(ConfigError::Invalid(
                "num_batches must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        self.policies()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.blend_options
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Region blender matching this configuration.
    pub fn blender(&self) -> RegionBlender {
        RegionBlender::new(self.width, self.height)
            .policies(self.policies())
            .options(self.blend_options.clone())
    }
}

/// Policy selector written either as its integer value or its name.
#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyValue {
    Number(u8),
    Name(String),
}

fn policy_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u8, Error = PolicyError> + FromStr<Err = PolicyError>,
{
    let parsed = match PolicyValue::deserialize(deserializer)? {
        PolicyValue::Number(value) => T::try_from(value),
        PolicyValue::Name(name) => name.parse(),
    };
    parsed.map_err(serde::de::Error::custom)
}

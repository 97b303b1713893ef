use std::path::PathBuf;

use region_blend::RegionError;
use thiserror::Error;

/// Failure of one inpainting item.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Region error: {0}")]
    Region(#[from] RegionError),

    #[error("Generation failed: {0:#}")]
    Generation(anyhow::Error),

    #[error(
        "Generator returned {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    ContractViolation {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Whether the error came from the generation collaborator rather than
    /// from this crate's own geometry or compositing.
    pub fn is_generator_fault(&self) -> bool {
        matches!(
            self,
            PipelineError::Generation(_) | PipelineError::ContractViolation { .. }
        )
    }
}

/// Failure to read or accept a pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

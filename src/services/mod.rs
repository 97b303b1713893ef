pub mod generator;
pub mod pipeline;

pub use generator::ImageGenerator;
pub use pipeline::{BatchReport, InpaintPipeline, ItemOutcome};

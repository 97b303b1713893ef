pub mod config;
pub mod params;
pub mod request;

pub use config::InpaintingConfig;
pub use params::{GenerationParams, RANDOM_SEED};
pub use request::InpaintRequest;

//! Public API for the region-blend crate.
//!
//! This module provides the high-level API: the [`RegionBlender`] builder,
//! the composed [`run`] call, and the [`RegionError`] unified error type.

mod builder;
mod error;
mod run;

pub use builder::RegionBlender;
pub use error::RegionError;
pub use run::{run, run_with_options, RunError};

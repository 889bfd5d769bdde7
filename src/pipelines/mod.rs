//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait,
//! implemented by the [Extract] pipeline.
pub mod extract;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use extract::{Extract, OnMalformed, Summary};
pub use pipeline::Pipeline;

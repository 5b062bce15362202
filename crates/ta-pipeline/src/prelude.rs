//! Prelude for ta-pipeline.
//!
//! This module re-exports the pipeline types together with the core data
//! model.

pub use crate::config::{Execution, PipelineConfig};
pub use crate::interop::{FeatureEngine, Layout, MatrixBuffer};
pub use crate::pipeline::Pipeline;
pub use crate::request::IndicatorRequest;

pub use ta_core::prelude::*;
pub use ta_kernels::KernelRegistry;

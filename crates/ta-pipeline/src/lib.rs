//! # ta-pipeline
//!
//! Pipeline orchestrator and interop boundary for the feature engine.
//!
//! - [`IndicatorRequest`]: one requested feature column (kernel + parameters)
//! - [`Pipeline`]: plans and executes requests into a [`ta_core::FeatureMatrix`],
//!   sequentially or over a fixed rayon worker pool
//! - [`FeatureEngine`]: array-in, matrix-out facade with [`Layout`] export
//!
//! A run is all-or-nothing: any invalid request fails it before a single
//! kernel runs, and no partial matrix is ever returned.
//!
//! # Example
//!
//! ```
//! use ta_pipeline::prelude::*;
//!
//! let close = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let engine = FeatureEngine::new(PipelineConfig::parallel(2)).unwrap();
//!
//! let matrix = engine
//!     .compute(&[("close", &close)], &[IndicatorRequest::new("ema", 3)])
//!     .unwrap();
//! assert_eq!(matrix.column(0)[2..], [2.0, 3.0, 4.0]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod config;
mod interop;
mod pipeline;
mod request;

pub mod prelude;

pub use config::{Execution, PipelineConfig};
pub use interop::{export, FeatureEngine, Layout, MatrixBuffer};
pub use pipeline::Pipeline;
pub use request::IndicatorRequest;

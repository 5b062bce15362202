//! # ta-core
//!
//! Core types and traits for the feature engine.
//!
//! This crate provides the foundational abstractions used by the kernels and
//! the pipeline:
//!
//! - [`SeriesBuffer`] - Borrowed, read-only view over caller-owned `f64` data
//! - [`SeriesSet`] and [`Field`] - Equal-length OHLCV inputs for one run
//! - [`FeatureMatrix`] - Column-major N x K output of a run
//! - [`Kernel`] and [`KernelParams`] - Stateless indicator computation
//! - [`EngineError`] - Typed errors (shape, invalid parameter, unknown kernel)
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```rust
//! use ta_core::prelude::*;
//!
//! let closes = vec![100.0, 101.5, 99.8, 102.3, 101.0];
//! let set = SeriesSet::new().with(Field::Close, &closes).unwrap();
//!
//! assert_eq!(set.len(), 5);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod matrix;
pub mod ohlcv;
pub mod prelude;
pub mod series;
pub mod traits;
pub mod utils;

// Re-export core types at crate root
pub use error::{EngineError, ErrorKind, Result};
pub use matrix::FeatureMatrix;
pub use ohlcv::{Field, SeriesSet};
pub use series::{make_series, SeriesBuffer};
pub use traits::{check_inputs, Kernel, KernelParams};

//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits from ta-core.
//!
//! # Example
//!
//! ```rust
//! use ta_core::prelude::*;
//!
//! let data = [1.0, 2.0, 3.0];
//! let series = make_series(&data, 3).unwrap();
//! assert_eq!(series.len(), 3);
//! ```

// Core types
pub use crate::matrix::FeatureMatrix;
pub use crate::ohlcv::{Field, SeriesSet};
pub use crate::series::{make_series, SeriesBuffer};

// Error types
pub use crate::error::{EngineError, ErrorKind, Result};

// Traits
pub use crate::traits::{check_inputs, Kernel, KernelParams};

// Utility functions
pub use crate::utils::{ema_alpha, for_each_window, true_range, wilder_step, RollingMoments};

//! # ta-kernels
//!
//! Stateless, single-pass indicator kernels for the feature engine.
//!
//! Kernels are organized into three categories:
//!
//! - **Trend**: SMA (rolling mean), EMA
//! - **Momentum**: RSI (Wilder), ROC, log return
//! - **Volatility**: rolling standard deviation, Bollinger bands, ATR
//!
//! Every kernel is available two ways: as a unit struct implementing
//! [`ta_core::Kernel`] (what the pipeline resolves through the
//! [`KernelRegistry`]), and as a free function over a slice that returns a
//! freshly allocated column.
//!
//! # NaN policy
//!
//! Finite-window kernels (SMA, rolling std, Bollinger, ROC, log return) emit
//! NaN only for windows that contain a non-finite value and recover once it
//! leaves the window. Recursive kernels (EMA, RSI, ATR) carry their state
//! forever, so a single NaN makes every later output NaN.
//!
//! # Example
//!
//! ```
//! use ta_kernels::prelude::*;
//!
//! let out = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
//! assert!(out[0].is_nan() && out[1].is_nan());
//! assert_eq!(&out[2..], &[2.0, 3.0, 4.0]);
//! ```
//!
//! The crate root re-exports the core types, so callers need only this crate:
//!
//! ```
//! fn smoothed(close: &[f64]) -> ta_kernels::Result<Vec<f64>> {
//!     ta_kernels::ema(close, 2)
//! }
//!
//! assert_eq!(smoothed(&[1.0, 3.0]).unwrap()[1], 2.0);
//!
//! let err: ta_kernels::EngineError = ta_kernels::rsi(&[1.0, 2.0], 0).unwrap_err();
//! assert_eq!(err.kind(), ta_kernels::ErrorKind::InvalidParameter);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod momentum;
pub mod registry;
pub mod trend;
pub mod volatility;

pub mod prelude;

pub use prelude::*;

/// Reject a zero period.
pub(crate) fn validate_period(period: usize) -> ta_core::Result<()> {
    if period == 0 {
        return Err(ta_core::EngineError::invalid_parameter("period", 0, "integer >= 1"));
    }
    Ok(())
}

/// Reject an output slice that does not line up with its input.
pub(crate) fn check_len(input: &[f64], out: &[f64]) -> ta_core::Result<()> {
    if input.len() != out.len() {
        return Err(ta_core::EngineError::LengthMismatch {
            field: "output".to_string(),
            expected: input.len(),
            actual: out.len(),
        });
    }
    Ok(())
}

/// Allocate an output column and fill it with `compute`.
pub(crate) fn allocate_with<F>(len: usize, compute: F) -> ta_core::Result<Vec<f64>>
where
    F: FnOnce(&mut [f64]) -> ta_core::Result<()>,
{
    let mut out = vec![f64::NAN; len];
    compute(&mut out)?;
    Ok(out)
}

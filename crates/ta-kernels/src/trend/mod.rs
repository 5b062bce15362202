//! Trend indicators.
//!
//! This module contains trend-following kernels:
//! - SMA (Simple Moving Average, also served as `rolling_mean`)
//! - EMA (Exponential Moving Average)

mod ema;
mod sma;

pub use ema::{ema, ema_into, Ema};
pub use sma::{sma, sma_into, Sma};

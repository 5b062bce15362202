//! Momentum indicators.
//!
//! This module contains momentum kernels:
//! - RSI (Relative Strength Index, Wilder smoothing)
//! - ROC (Rate of Change)
//! - Log return

mod roc;
mod rsi;

pub use roc::{log_return, log_return_into, roc, roc_into, LogReturn, Roc};
pub use rsi::{rsi, rsi_into, Rsi};

//! Prelude module for convenient imports.
//!
//! ```
//! use ta_kernels::prelude::*;
//! ```

pub use crate::momentum::{log_return, roc, rsi, LogReturn, Roc, Rsi};
pub use crate::registry::KernelRegistry;
pub use crate::trend::{ema, sma, Ema, Sma};
pub use crate::volatility::{
    atr, bollinger, bollinger_band, rolling_std, Atr, BandOutput, BollingerBand,
    BollingerSeries, RollingStd,
};

pub use ta_core::prelude::*;

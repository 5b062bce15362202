//! Volatility indicators.
//!
//! This module contains volatility kernels:
//! - Rolling standard deviation (population)
//! - Bollinger Bands (upper, lower, %B, width)
//! - ATR (Average True Range)

mod atr;
mod bollinger;
mod rolling;

pub use atr::{atr, atr_into, Atr};
pub use bollinger::{
    bollinger, bollinger_band, bollinger_into, BandOutput, BollingerBand, BollingerSeries,
    DEFAULT_MULTIPLIER,
};
pub use rolling::{rolling_std, rolling_std_into, RollingStd};

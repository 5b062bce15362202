//! Relative Strength Index (RSI) kernel.
//!
//! RSI is a momentum oscillator that measures the speed and magnitude
//! of recent price changes to evaluate overbought or oversold conditions.

use ta_core::{
    check_inputs,
    utils::{fill_nan, wilder_step},
    Field, Kernel, KernelParams, Result, SeriesBuffer,
};

use crate::{allocate_with, check_len, validate_period};

/// Relative Strength Index with Wilder smoothing.
///
/// # Formula
///
/// ```text
/// delta[t]  = x[t] - x[t-1]
/// gain, loss = max(delta, 0), max(-delta, 0)
/// avg[p]    = mean of the first p gains (losses)
/// avg[t]    = (avg[t-1] * (p - 1) + current) / p
/// RSI       = 100 - 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// Indices `0..p` are NaN; the first value sits at index `p`, the first
/// point with `p` deltas behind it. A zero average loss gives 100, or 50
/// when the average gain is zero too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rsi;

impl Rsi {
    /// RSI from smoothed gain and loss averages.
    #[must_use]
    pub fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            return if avg_gain == 0.0 { 50.0 } else { 100.0 };
        }
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Kernel for Rsi {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn required_fields(&self, params: &KernelParams) -> Vec<Field> {
        vec![params.source]
    }

    fn warm_up(&self, params: &KernelParams) -> usize {
        params.period
    }

    fn compute(
        &self,
        inputs: &[SeriesBuffer<'_>],
        params: &KernelParams,
        out: &mut [f64],
    ) -> Result<()> {
        self.validate(params)?;
        check_inputs(self, inputs, params, out)?;
        rsi_into(inputs[0].as_slice(), params.period, out)
    }
}

/// Split a price change into (gain, loss). NaN maps to NaN on both sides.
fn split_delta(delta: f64) -> (f64, f64) {
    if delta > 0.0 {
        (delta, 0.0)
    } else if delta < 0.0 {
        (0.0, -delta)
    } else if delta == 0.0 {
        (0.0, 0.0)
    } else {
        (f64::NAN, f64::NAN)
    }
}

/// Compute the RSI of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `out.len() != data.len()`.
pub fn rsi_into(data: &[f64], period: usize, out: &mut [f64]) -> Result<()> {
    validate_period(period)?;
    check_len(data, out)?;
    fill_nan(out);

    let len = data.len();
    if len <= period {
        return Ok(());
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let (gain, loss) = split_delta(data[i] - data[i - 1]);
        gain_sum += gain;
        loss_sum += loss;
    }

    let n = period as f64;
    let mut avg_gain = gain_sum / n;
    let mut avg_loss = loss_sum / n;
    out[period] = Rsi::from_averages(avg_gain, avg_loss);

    for i in (period + 1)..len {
        let (gain, loss) = split_delta(data[i] - data[i - 1]);
        avg_gain = wilder_step(avg_gain, gain, period);
        avg_loss = wilder_step(avg_loss, loss, period);
        out[i] = Rsi::from_averages(avg_gain, avg_loss);
    }

    Ok(())
}

/// Compute the RSI of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0`.
pub fn rsi(data: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| rsi_into(data, period, out))
}

//! Exponential Moving Average (EMA) kernel.
//!
//! The EMA gives more weight to recent prices using an exponential
//! smoothing factor. The first full window is seeded with its simple mean.

use ta_core::{
    check_inputs,
    utils::{ema_alpha, fill_nan},
    Field, Kernel, KernelParams, Result, SeriesBuffer,
};

use crate::{allocate_with, check_len, validate_period};

/// Exponential Moving Average kernel.
///
/// # Formula
///
/// ```text
/// alpha  = 2 / (period + 1)
/// EMA[p-1] = mean(x[0..p])
/// EMA[t]   = EMA[t-1] + alpha * (x[t] - EMA[t-1])
/// ```
///
/// Indices `0..p-1` are NaN. A period of 1 reproduces the input exactly.
/// Once a NaN enters the recursion every later value is NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ema;

impl Kernel for Ema {
    fn name(&self) -> &'static str {
        "ema"
    }

    fn required_fields(&self, params: &KernelParams) -> Vec<Field> {
        vec![params.source]
    }

    fn warm_up(&self, params: &KernelParams) -> usize {
        params.period.saturating_sub(1)
    }

    fn compute(
        &self,
        inputs: &[SeriesBuffer<'_>],
        params: &KernelParams,
        out: &mut [f64],
    ) -> Result<()> {
        self.validate(params)?;
        check_inputs(self, inputs, params, out)?;
        ema_into(inputs[0].as_slice(), params.period, out)
    }
}

/// Compute the EMA of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `out.len() != data.len()`.
pub fn ema_into(data: &[f64], period: usize, out: &mut [f64]) -> Result<()> {
    validate_period(period)?;
    check_len(data, out)?;
    fill_nan(out);

    let len = data.len();
    if len < period {
        return Ok(());
    }
    if period == 1 {
        out.copy_from_slice(data);
        return Ok(());
    }

    let alpha = ema_alpha(period);
    let mut sum = 0.0;
    for &x in &data[..period] {
        sum += x;
    }
    let mut ema = sum / period as f64;
    out[period - 1] = ema;

    for i in period..len {
        ema += alpha * (data[i] - ema);
        out[i] = ema;
    }

    Ok(())
}

/// Compute the EMA of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0`.
///
/// # Example
///
/// ```
/// use ta_kernels::trend::ema;
///
/// let out = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
/// assert_eq!(out[4], 4.0);
/// ```
pub fn ema(data: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| ema_into(data, period, out))
}

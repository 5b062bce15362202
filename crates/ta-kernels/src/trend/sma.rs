//! Simple Moving Average (SMA) kernel.
//!
//! Also registered as `rolling_mean` and `bb_middle`.

use ta_core::{
    check_inputs,
    utils::{fill_nan, for_each_window},
    Field, Kernel, KernelParams, Result, SeriesBuffer,
};

use crate::{allocate_with, check_len, validate_period};

/// Simple Moving Average kernel.
///
/// `SMA[t] = mean(x[t-p+1..=t])`. Indices `0..p-1` are NaN, as is any
/// window holding a non-finite value. A window of identical values yields
/// exactly that value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sma;

impl Kernel for Sma {
    fn name(&self) -> &'static str {
        "sma"
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
        sma_into(inputs[0].as_slice(), params.period, out)
    }
}

/// Compute the rolling mean of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `out.len() != data.len()`.
pub fn sma_into(data: &[f64], period: usize, out: &mut [f64]) -> Result<()> {
    validate_period(period)?;
    check_len(data, out)?;
    fill_nan(out);
    for_each_window(data, period, |i, moments| out[i] = moments.mean());
    Ok(())
}

/// Compute the rolling mean of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0`.
pub fn sma(data: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| sma_into(data, period, out))
}

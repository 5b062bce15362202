//! Rolling population standard deviation kernel.

use ta_core::{
    check_inputs,
    utils::{fill_nan, for_each_window},
    Field, Kernel, KernelParams, Result, SeriesBuffer,
};

use crate::{allocate_with, check_len, validate_period};

/// Rolling population standard deviation (ddof = 0).
///
/// Maintained from a running sum and sum of squares, so a pass is O(N) for
/// any period. Indices `0..p-1` are NaN. A window of identical values has a
/// deviation of exactly 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingStd;

impl Kernel for RollingStd {
    fn name(&self) -> &'static str {
        "rolling_std"
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
        rolling_std_into(inputs[0].as_slice(), params.period, out)
    }
}

/// Compute the rolling standard deviation of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `out.len() != data.len()`.
pub fn rolling_std_into(data: &[f64], period: usize, out: &mut [f64]) -> Result<()> {
    validate_period(period)?;
    check_len(data, out)?;
    fill_nan(out);
    for_each_window(data, period, |i, moments| out[i] = moments.std_dev());
    Ok(())
}

/// Compute the rolling standard deviation of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0`.
pub fn rolling_std(data: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| rolling_std_into(data, period, out))
}

//! Rate of change kernels: percentage ROC and log return.

use ta_core::{check_inputs, utils::fill_nan, Field, Kernel, KernelParams, Result, SeriesBuffer};

use crate::{allocate_with, check_len, validate_period};

/// Rate of Change kernel.
///
/// `ROC[t] = 100 * (x[t] - x[t-p]) / x[t-p]`. Indices `0..p` are NaN, and so
/// is any point whose base price is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Roc;

/// Log return kernel.
///
/// `LR[t] = ln(x[t] / x[t-p])`. Indices `0..p` are NaN, and so is any point
/// where either price is not strictly positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReturn;

macro_rules! lagged_kernel {
    ($kernel:ty, $name:literal, $into:ident) => {
        impl Kernel for $kernel {
            fn name(&self) -> &'static str {
                $name
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
                $into(inputs[0].as_slice(), params.period, out)
            }
        }
    };
}

lagged_kernel!(Roc, "roc", roc_into);
lagged_kernel!(LogReturn, "log_return", log_return_into);

/// Apply `f(current, base)` to every pair `p` points apart.
fn lagged_into<F>(data: &[f64], period: usize, out: &mut [f64], f: F) -> Result<()>
where
    F: Fn(f64, f64) -> f64,
{
    validate_period(period)?;
    check_len(data, out)?;
    fill_nan(out);

    for i in period..data.len() {
        out[i] = f(data[i], data[i - period]);
    }
    Ok(())
}

/// Compute the percentage rate of change of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `out.len() != data.len()`.
pub fn roc_into(data: &[f64], period: usize, out: &mut [f64]) -> Result<()> {
    lagged_into(data, period, out, |current, base| {
        if base == 0.0 {
            f64::NAN
        } else {
            100.0 * (current - base) / base
        }
    })
}

/// Compute the percentage rate of change of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0`.
pub fn roc(data: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| roc_into(data, period, out))
}

/// Compute the log return of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `out.len() != data.len()`.
pub fn log_return_into(data: &[f64], period: usize, out: &mut [f64]) -> Result<()> {
    lagged_into(data, period, out, |current, base| {
        if current > 0.0 && base > 0.0 {
            (current / base).ln()
        } else {
            f64::NAN
        }
    })
}

/// Compute the log return of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0`.
pub fn log_return(data: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| log_return_into(data, period, out))
}

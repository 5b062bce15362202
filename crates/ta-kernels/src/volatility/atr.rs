//! Average True Range (ATR) kernel.
//!
//! ATR measures market volatility using True Range with Wilder's smoothing.

use ta_core::{
    check_inputs,
    utils::{fill_nan, true_range, wilder_step},
    EngineError, Field, Kernel, KernelParams, Result, SeriesBuffer,
};

use crate::{allocate_with, validate_period};

/// Average True Range kernel, reading high, low and close.
///
/// # Formula
///
/// ```text
/// TR[0] = high[0] - low[0]
/// TR[t] = max(high - low, |high - close[t-1]|, |low - close[t-1]|)
/// ATR[p-1] = mean(TR[0..p])
/// ATR[t]   = (ATR[t-1] * (p - 1) + TR[t]) / p
/// ```
///
/// Indices `0..p-1` are NaN. A NaN in any input poisons every later value.
/// A `source` other than `close` is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atr;

impl Kernel for Atr {
    fn name(&self) -> &'static str {
        "atr"
    }

    fn required_fields(&self, _params: &KernelParams) -> Vec<Field> {
        vec![Field::High, Field::Low, Field::Close]
    }

    fn warm_up(&self, params: &KernelParams) -> usize {
        params.period.saturating_sub(1)
    }

    fn accepts_source(&self) -> bool {
        false
    }

    fn compute(
        &self,
        inputs: &[SeriesBuffer<'_>],
        params: &KernelParams,
        out: &mut [f64],
    ) -> Result<()> {
        self.validate(params)?;
        check_inputs(self, inputs, params, out)?;
        atr_into(
            inputs[0].as_slice(),
            inputs[1].as_slice(),
            inputs[2].as_slice(),
            params.period,
            out,
        )
    }
}

fn check_hlc(high: &[f64], low: &[f64], close: &[f64], out: &[f64]) -> Result<()> {
    for (field, series) in [("high", high), ("low", low), ("close", close)] {
        if series.len() != out.len() {
            return Err(EngineError::LengthMismatch {
                field: field.to_string(),
                expected: out.len(),
                actual: series.len(),
            });
        }
    }
    Ok(())
}

/// True range at index `i`.
fn tr_at(high: &[f64], low: &[f64], close: &[f64], i: usize) -> f64 {
    if i == 0 {
        high[0] - low[0]
    } else {
        true_range(high[i], low[i], close[i - 1])
    }
}

/// Compute the ATR into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0` or any input length differs from
/// `out.len()`.
pub fn atr_into(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    out: &mut [f64],
) -> Result<()> {
    validate_period(period)?;
    check_hlc(high, low, close, out)?;
    fill_nan(out);

    let len = out.len();
    if len < period {
        return Ok(());
    }

    let mut sum = 0.0;
    for i in 0..period {
        sum += tr_at(high, low, close, i);
    }
    let mut atr = sum / period as f64;
    out[period - 1] = atr;

    for i in period..len {
        atr = wilder_step(atr, tr_at(high, low, close, i), period);
        out[i] = atr;
    }

    Ok(())
}

/// Compute the ATR.
///
/// # Errors
///
/// Returns an error if `period == 0` or the inputs differ in length.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<Vec<f64>> {
    allocate_with(close.len(), |out| atr_into(high, low, close, period, out))
}

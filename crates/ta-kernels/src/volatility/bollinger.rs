//! Bollinger Bands kernels.
//!
//! Bollinger Bands place a volatility envelope of `k` population standard
//! deviations around a rolling mean. Each band is a separate kernel so a
//! request produces exactly one column; [`bollinger`] computes all of them in
//! one pass for callers outside the pipeline.

use ta_core::{
    check_inputs,
    utils::{fill_nan, for_each_window, RollingMoments},
    EngineError, Field, Kernel, KernelParams, Result, SeriesBuffer,
};

use crate::{allocate_with, check_len, validate_period};

/// Band width in standard deviations when a request gives none.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Which Bollinger output a kernel produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandOutput {
    /// `middle + k * std`
    Upper,
    /// `middle - k * std`
    Lower,
    /// `(x - lower) / (upper - lower)`, 0.5 for a zero-width band
    PercentB,
    /// `(upper - lower) / middle`, NaN when the middle band is 0
    Width,
}

impl BandOutput {
    fn kernel_name(self) -> &'static str {
        match self {
            BandOutput::Upper => "bb_upper",
            BandOutput::Lower => "bb_lower",
            BandOutput::PercentB => "bb_percent_b",
            BandOutput::Width => "bb_width",
        }
    }
}

/// One Bollinger band output as a kernel.
///
/// The middle band is served by [`crate::trend::Sma`] under the name
/// `bb_middle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BollingerBand {
    output: BandOutput,
}

impl BollingerBand {
    /// Create a kernel for the given band output.
    #[must_use]
    pub fn new(output: BandOutput) -> Self {
        Self { output }
    }

    /// Upper band kernel.
    #[must_use]
    pub fn upper() -> Self {
        Self::new(BandOutput::Upper)
    }

    /// Lower band kernel.
    #[must_use]
    pub fn lower() -> Self {
        Self::new(BandOutput::Lower)
    }

    /// %B kernel.
    #[must_use]
    pub fn percent_b() -> Self {
        Self::new(BandOutput::PercentB)
    }

    /// Band width kernel.
    #[must_use]
    pub fn width() -> Self {
        Self::new(BandOutput::Width)
    }

    /// The output this kernel produces.
    #[must_use]
    pub fn output(&self) -> BandOutput {
        self.output
    }
}

impl Kernel for BollingerBand {
    fn name(&self) -> &'static str {
        self.output.kernel_name()
    }

    fn required_fields(&self, params: &KernelParams) -> Vec<Field> {
        vec![params.source]
    }

    fn warm_up(&self, params: &KernelParams) -> usize {
        params.period.saturating_sub(1)
    }

    fn accepts_multiplier(&self) -> bool {
        true
    }

    fn validate(&self, params: &KernelParams) -> Result<()> {
        validate_period(params.period)?;
        validate_multiplier(params.multiplier.unwrap_or(DEFAULT_MULTIPLIER))
    }

    fn compute(
        &self,
        inputs: &[SeriesBuffer<'_>],
        params: &KernelParams,
        out: &mut [f64],
    ) -> Result<()> {
        self.validate(params)?;
        check_inputs(self, inputs, params, out)?;
        let k = params.multiplier.unwrap_or(DEFAULT_MULTIPLIER);
        bollinger_into(inputs[0].as_slice(), params.period, k, self.output, out)
    }
}

fn validate_multiplier(k: f64) -> Result<()> {
    if !(k.is_finite() && k > 0.0) {
        return Err(EngineError::invalid_parameter(
            "multiplier",
            k,
            "finite number > 0",
        ));
    }
    Ok(())
}

/// All Bollinger outputs at one index.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BandPoint {
    upper: f64,
    middle: f64,
    lower: f64,
    percent_b: f64,
    width: f64,
}

impl BandPoint {
    fn from_moments(price: f64, moments: &RollingMoments, k: f64) -> Self {
        let middle = moments.mean();
        let band = k * moments.std_dev();
        let upper = middle + band;
        let lower = middle - band;
        let range = upper - lower;

        let percent_b = if range == 0.0 {
            0.5
        } else {
            (price - lower) / range
        };
        let width = if middle == 0.0 { f64::NAN } else { range / middle };

        Self {
            upper,
            middle,
            lower,
            percent_b,
            width,
        }
    }

    fn select(&self, output: BandOutput) -> f64 {
        match output {
            BandOutput::Upper => self.upper,
            BandOutput::Lower => self.lower,
            BandOutput::PercentB => self.percent_b,
            BandOutput::Width => self.width,
        }
    }
}

/// Compute one Bollinger output of `data` into `out`.
///
/// # Errors
///
/// Returns an error if `period == 0`, `k` is not a finite positive number, or
/// `out.len() != data.len()`.
pub fn bollinger_into(
    data: &[f64],
    period: usize,
    k: f64,
    output: BandOutput,
    out: &mut [f64],
) -> Result<()> {
    validate_period(period)?;
    validate_multiplier(k)?;
    check_len(data, out)?;
    fill_nan(out);
    for_each_window(data, period, |i, moments| {
        out[i] = BandPoint::from_moments(data[i], moments, k).select(output);
    });
    Ok(())
}

/// Every Bollinger output of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    /// Upper band.
    pub upper: Vec<f64>,
    /// Middle band (rolling mean).
    pub middle: Vec<f64>,
    /// Lower band.
    pub lower: Vec<f64>,
    /// %B.
    pub percent_b: Vec<f64>,
    /// Band width relative to the middle band.
    pub width: Vec<f64>,
}

/// Compute all Bollinger outputs of `data` in one pass.
///
/// # Errors
///
/// Returns an error if `period == 0` or `k` is not a finite positive number.
///
/// # Example
///
/// ```
/// use ta_kernels::volatility::bollinger;
///
/// let bands = bollinger(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, 2.0).unwrap();
/// assert!(bands.middle[1].is_nan());
/// assert_eq!(bands.middle[4], 4.0);
/// assert!(bands.upper[4] > bands.middle[4]);
/// ```
pub fn bollinger(data: &[f64], period: usize, k: f64) -> Result<BollingerSeries> {
    validate_period(period)?;
    validate_multiplier(k)?;

    let len = data.len();
    let mut bands = BollingerSeries {
        upper: vec![f64::NAN; len],
        middle: vec![f64::NAN; len],
        lower: vec![f64::NAN; len],
        percent_b: vec![f64::NAN; len],
        width: vec![f64::NAN; len],
    };

    for_each_window(data, period, |i, moments| {
        let point = BandPoint::from_moments(data[i], moments, k);
        bands.upper[i] = point.upper;
        bands.middle[i] = point.middle;
        bands.lower[i] = point.lower;
        bands.percent_b[i] = point.percent_b;
        bands.width[i] = point.width;
    });

    Ok(bands)
}

/// Compute one Bollinger output of `data`.
///
/// # Errors
///
/// Returns an error if `period == 0` or `k` is not a finite positive number.
pub fn bollinger_band(data: &[f64], period: usize, k: f64, output: BandOutput) -> Result<Vec<f64>> {
    allocate_with(data.len(), |out| bollinger_into(data, period, k, output, out))
}

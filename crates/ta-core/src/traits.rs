//! Core trait definitions for indicator kernels.
//!
//! A kernel is a stateless, single-pass algorithm that turns one or more
//! input buffers into one output column of the same length. Kernels hold no
//! state between calls, so the same kernel object can be shared across
//! threads and invoked concurrently on different columns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::ohlcv::Field;
use crate::series::SeriesBuffer;

/// Validated parameters handed to a kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KernelParams {
    /// Lookback period (>= 1).
    pub period: usize,
    /// Optional secondary parameter (e.g. band width in standard deviations).
    pub multiplier: Option<f64>,
    /// Input field for kernels that read a single series.
    pub source: Field,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            period: 14,
            multiplier: None,
            source: Field::Close,
        }
    }
}

impl KernelParams {
    /// Create parameters with the given period, reading `close`.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    /// Convert a signed caller-supplied period.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if `period <= 0`.
    pub fn from_signed(period: i64) -> Result<Self> {
        let period = usize::try_from(period)
            .ok()
            .filter(|&p| p >= 1)
            .ok_or_else(|| EngineError::invalid_parameter("period", period, "integer >= 1"))?;
        Ok(Self::new(period))
    }

    /// Set the secondary parameter.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the input field.
    #[must_use]
    pub fn with_source(mut self, source: Field) -> Self {
        self.source = source;
        self
    }
}

/// Core trait for indicator kernels.
///
/// # Contract
///
/// - `compute` is deterministic given its inputs and parameters.
/// - `inputs` holds one buffer per entry of `required_fields`, in the same
///   order, all of length `out.len()`.
/// - `compute` writes every cell of `out`; warm-up cells are NaN.
/// - Kernels never mutate their inputs (they only receive shared views).
///
/// # Example Implementation
///
/// ```rust
/// use ta_core::{Field, Kernel, KernelParams, Result, SeriesBuffer};
///
/// struct Identity;
///
/// impl Kernel for Identity {
///     fn name(&self) -> &'static str { "identity" }
///     fn required_fields(&self, params: &KernelParams) -> Vec<Field> { vec![params.source] }
///     fn warm_up(&self, _params: &KernelParams) -> usize { 0 }
///     fn compute(&self, inputs: &[SeriesBuffer<'_>], _p: &KernelParams, out: &mut [f64]) -> Result<()> {
///         out.copy_from_slice(inputs[0].as_slice());
///         Ok(())
///     }
/// }
/// ```
pub trait Kernel: Send + Sync {
    /// Registry name of the kernel.
    fn name(&self) -> &'static str;

    /// Fields the kernel reads, in the order `compute` expects them.
    fn required_fields(&self, params: &KernelParams) -> Vec<Field>;

    /// Number of leading NaN cells on clean input.
    fn warm_up(&self, params: &KernelParams) -> usize;

    /// Whether the kernel takes a secondary `multiplier` parameter.
    fn accepts_multiplier(&self) -> bool {
        false
    }

    /// Whether the kernel reads `params.source`.
    ///
    /// Kernels with a fixed set of input fields return `false`, and a source
    /// other than `close` is then rejected.
    fn accepts_source(&self) -> bool {
        true
    }

    /// Check parameters before any computation runs.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] for a zero period, a
    /// multiplier passed to a kernel that takes none, or a source override
    /// passed to a kernel with fixed inputs.
    fn validate(&self, params: &KernelParams) -> Result<()> {
        if params.period == 0 {
            return Err(EngineError::invalid_parameter("period", 0, "integer >= 1"));
        }
        if params.source != Field::Close && !self.accepts_source() {
            return Err(EngineError::invalid_parameter(
                "source",
                params.source,
                format!("no source override for '{}'", self.name()),
            ));
        }
        if let Some(m) = params.multiplier {
            if !self.accepts_multiplier() {
                return Err(EngineError::invalid_parameter(
                    "multiplier",
                    m,
                    format!("no secondary parameter for '{}'", self.name()),
                ));
            }
        }
        Ok(())
    }

    /// Compute the output column into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are invalid or the inputs do not match
    /// the declared fields.
    fn compute(
        &self,
        inputs: &[SeriesBuffer<'_>],
        params: &KernelParams,
        out: &mut [f64],
    ) -> Result<()>;
}

/// Check that `inputs` matches what `kernel` declared and that every buffer
/// has the length of `out`.
///
/// # Errors
///
/// Returns a shape error describing the first disagreement.
pub fn check_inputs<K: Kernel + ?Sized>(
    kernel: &K,
    inputs: &[SeriesBuffer<'_>],
    params: &KernelParams,
    out: &[f64],
) -> Result<()> {
    let fields = kernel.required_fields(params);
    if inputs.len() != fields.len() {
        let missing = fields.get(inputs.len()).copied().unwrap_or(params.source);
        return Err(EngineError::MissingField {
            kernel: kernel.name().to_string(),
            field: missing,
        });
    }
    for (field, buffer) in fields.iter().zip(inputs) {
        if buffer.len() != out.len() {
            return Err(EngineError::LengthMismatch {
                field: field.to_string(),
                expected: out.len(),
                actual: buffer.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough;

    impl Kernel for Passthrough {
        fn name(&self) -> &'static str {
            "passthrough"
        }

        fn required_fields(&self, params: &KernelParams) -> Vec<Field> {
            vec![params.source]
        }

        fn warm_up(&self, _params: &KernelParams) -> usize {
            0
        }

        fn compute(
            &self,
            inputs: &[SeriesBuffer<'_>],
            params: &KernelParams,
            out: &mut [f64],
        ) -> Result<()> {
            self.validate(params)?;
            check_inputs(self, inputs, params, out)?;
            out.copy_from_slice(inputs[0].as_slice());
            Ok(())
        }
    }

    #[test]
    fn test_params_from_signed() {
        assert_eq!(KernelParams::from_signed(5).unwrap().period, 5);

        let err = KernelParams::from_signed(0).unwrap_err();
        assert_eq!(
            err,
            EngineError::invalid_parameter("period", 0, "integer >= 1")
        );
        assert!(KernelParams::from_signed(-3).is_err());
    }

    #[test]
    fn test_params_builder() {
        let params = KernelParams::new(20)
            .with_multiplier(2.5)
            .with_source(Field::Volume);
        assert_eq!(params.period, 20);
        assert_eq!(params.multiplier, Some(2.5));
        assert_eq!(params.source, Field::Volume);
    }

    #[test]
    fn test_default_validate_rejects_multiplier() {
        let params = KernelParams::new(3).with_multiplier(2.0);
        let err = Passthrough.validate(&params).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter {
                name: "multiplier",
                ..
            }
        ));
    }

    struct FixedInputs;

    impl Kernel for FixedInputs {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn required_fields(&self, _params: &KernelParams) -> Vec<Field> {
            vec![Field::High, Field::Low]
        }

        fn warm_up(&self, _params: &KernelParams) -> usize {
            0
        }

        fn accepts_source(&self) -> bool {
            false
        }

        fn compute(
            &self,
            _inputs: &[SeriesBuffer<'_>],
            params: &KernelParams,
            _out: &mut [f64],
        ) -> Result<()> {
            self.validate(params)
        }
    }

    #[test]
    fn test_default_validate_rejects_source_for_fixed_inputs() {
        assert!(FixedInputs.validate(&KernelParams::new(3)).is_ok());

        let err = FixedInputs
            .validate(&KernelParams::new(3).with_source(Field::Open))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::invalid_parameter("source", "open", "no source override for 'fixed'")
        );

        assert!(Passthrough
            .validate(&KernelParams::new(3).with_source(Field::Open))
            .is_ok());
    }

    #[test]
    fn test_check_inputs() {
        let data = [1.0, 2.0, 3.0];
        let buffer = SeriesBuffer::new(&data).unwrap();
        let params = KernelParams::new(1);

        let mut out = [0.0; 3];
        Passthrough.compute(&[buffer], &params, &mut out).unwrap();
        assert_eq!(out, data);

        let mut short = [0.0; 2];
        let err = Passthrough.compute(&[buffer], &params, &mut short).unwrap_err();
        assert!(err.is_shape());

        let err = Passthrough.compute(&[], &params, &mut out).unwrap_err();
        assert!(matches!(err, EngineError::MissingField { .. }));
    }
}

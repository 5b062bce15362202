//! Indicator requests: one requested output column each.

use serde::{Deserialize, Serialize};
use ta_core::{EngineError, Field, KernelParams, Result};

/// A request for one feature column: kernel name plus parameters.
///
/// `period` is signed so a caller can express a non-positive period and get
/// a typed rejection instead of a wrapped-around `usize`.
///
/// # JSON
///
/// ```json
/// {"kernel": "bb_upper", "period": 20, "multiplier": 2.0}
/// {"kernel": "sma", "period": 5, "source": "volume", "label": "vol_ma"}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    /// Registered kernel name (case-insensitive).
    pub kernel: String,
    /// Lookback period.
    pub period: i64,
    /// Secondary parameter for kernels that take one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    /// Input field for single-series kernels; `close` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Field>,
    /// Output column label; derived from the request when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl IndicatorRequest {
    /// Request `kernel` with `period`.
    pub fn new(kernel: impl Into<String>, period: i64) -> Self {
        Self {
            kernel: kernel.into(),
            period,
            multiplier: None,
            source: None,
            label: None,
        }
    }

    /// Set the secondary parameter.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Read `field` instead of `close`.
    #[must_use]
    pub fn on(mut self, field: Field) -> Self {
        self.source = Some(field);
        self
    }

    /// Name the output column.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Convert to kernel parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if `period <= 0`.
    pub fn params(&self) -> Result<KernelParams> {
        let mut params = KernelParams::from_signed(self.period)?;
        params.multiplier = self.multiplier;
        if let Some(source) = self.source {
            params.source = source;
        }
        Ok(params)
    }

    /// Output column label: the explicit label, or one derived from the
    /// kernel name, period, multiplier and a non-default source, such as
    /// `ema_3`, `bb_upper_20_2` or `sma_5_volume`.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }

        let mut label = format!("{}_{}", self.kernel.to_ascii_lowercase(), self.period);
        if let Some(m) = self.multiplier {
            label.push_str(&format!("_{m}"));
        }
        match self.source {
            Some(source) if source != Field::Close => label.push_str(&format!("_{source}")),
            _ => {}
        }
        label
    }

    /// Parse a JSON array of requests.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] naming `requests` if the
    /// JSON does not describe a list of requests.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).map_err(|e| {
            EngineError::invalid_parameter("requests", e, "a JSON array of indicator requests")
        })
    }
}

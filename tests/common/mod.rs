//! Common test utilities for the feature engine.
//!
//! This module provides float comparison, golden data loading, and
//! synthetic data generation shared by the end-to-end tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Tiered float comparison with tolerance levels.
///
/// - NaN must match NaN
/// - For values near zero (|expected| < 1e-10): absolute tolerance
/// - Otherwise: relative tolerance
pub fn assert_float_eq(actual: f64, expected: f64, epsilon: f64, context: &str) {
    if expected.is_nan() {
        assert!(
            actual.is_nan(),
            "{}: Expected NaN but got {}",
            context,
            actual
        );
        return;
    }

    if actual.is_nan() {
        panic!("{}: Got NaN but expected {}", context, expected);
    }

    // For values very close to zero, use absolute comparison
    if expected.abs() < 1e-10 {
        let diff = (actual - expected).abs();
        assert!(
            diff < epsilon,
            "{}: Expected {} but got {} (diff: {})",
            context,
            expected,
            actual,
            diff
        );
        return;
    }

    let rel_diff = ((actual - expected) / expected).abs();
    assert!(
        rel_diff < epsilon,
        "{}: Expected {} but got {} (rel diff: {:.2e})",
        context,
        expected,
        actual,
        rel_diff
    );
}

/// Assert two series are equal with tolerance.
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: f64, name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: Length mismatch: {} vs {}",
        name,
        actual.len(),
        expected.len()
    );

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let context = format!("{}[{}]", name, i);
        assert_float_eq(a, e, epsilon, &context);
    }
}

/// Golden data with input OHLCV and expected columns keyed by label.
///
/// `null` entries in the file are warm-up cells and load as NaN.
#[derive(Debug, Clone)]
pub struct GoldenData {
    /// Input open prices.
    pub open: Vec<f64>,
    /// Input high prices.
    pub high: Vec<f64>,
    /// Input low prices.
    pub low: Vec<f64>,
    /// Input close prices.
    pub close: Vec<f64>,
    /// Input volumes.
    pub volume: Vec<f64>,
    /// Expected columns keyed by label.
    pub expected: HashMap<String, Vec<f64>>,
}

#[derive(Deserialize)]
struct GoldenFile {
    ohlcv: OhlcvFile,
    expected: HashMap<String, Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct OhlcvFile {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl GoldenData {
    /// Load golden data from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let raw: GoldenFile = serde_json::from_reader(BufReader::new(file))?;

        let expected = raw
            .expected
            .into_iter()
            .map(|(label, values)| {
                let column = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                (label, column)
            })
            .collect();

        Ok(Self {
            open: raw.ohlcv.open,
            high: raw.ohlcv.high,
            low: raw.ohlcv.low,
            close: raw.ohlcv.close,
            volume: raw.ohlcv.volume,
            expected,
        })
    }

    /// Load the workspace golden file.
    pub fn load() -> Self {
        let path = golden_path();
        Self::from_json(&path)
            .unwrap_or_else(|e| panic!("could not load {}: {}", path.display(), e))
    }

    /// Named views in the shape `FeatureEngine::compute` takes.
    pub fn views(&self) -> Vec<(&str, &[f64])> {
        vec![
            ("open", self.open.as_slice()),
            ("high", self.high.as_slice()),
            ("low", self.low.as_slice()),
            ("close", self.close.as_slice()),
            ("volume", self.volume.as_slice()),
        ]
    }

    /// Expected column for `label`.
    pub fn column(&self, label: &str) -> &[f64] {
        self.expected
            .get(label)
            .unwrap_or_else(|| panic!("golden data has no '{}' column", label))
    }
}

/// Path of the workspace golden file.
pub fn golden_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/golden.json")
}

// ============================================================================
// Synthetic Data Generators
// ============================================================================

/// Generate linear price series.
pub fn generate_linear(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Generate sine wave price series.
pub fn generate_sine(center: f64, amplitude: f64, period: usize, len: usize) -> Vec<f64> {
    use std::f64::consts::PI;
    (0..len)
        .map(|i| center + amplitude * (2.0 * PI * i as f64 / period as f64).sin())
        .collect()
}

/// Generate random walk price series with deterministic seed.
pub fn generate_random_walk(start: f64, volatility: f64, len: usize, seed: u64) -> Vec<f64> {
    // Simple LCG for deterministic random numbers
    let mut rng_state = seed;
    let lcg_next = |state: &mut u64| -> f64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        // Convert to [-1, 1]
        (*state as f64 / u64::MAX as f64) * 2.0 - 1.0
    };

    let mut prices = Vec::with_capacity(len);
    let mut last = start;
    for _ in 0..len {
        prices.push(last);
        last = (last + lcg_next(&mut rng_state) * volatility).max(0.01);
    }
    prices
}

/// OHLCV columns built around a close series.
#[derive(Debug, Clone)]
pub struct Bars {
    /// Open prices (previous close).
    pub open: Vec<f64>,
    /// High prices.
    pub high: Vec<f64>,
    /// Low prices.
    pub low: Vec<f64>,
    /// Close prices.
    pub close: Vec<f64>,
    /// Volumes.
    pub volume: Vec<f64>,
}

impl Bars {
    /// Generate OHLCV data from close prices.
    pub fn from_close(close: &[f64], range_pct: f64) -> Self {
        let len = close.len();
        let mut bars = Self {
            open: Vec::with_capacity(len),
            high: Vec::with_capacity(len),
            low: Vec::with_capacity(len),
            close: close.to_vec(),
            volume: Vec::with_capacity(len),
        };

        for (i, &c) in close.iter().enumerate() {
            let range = c * range_pct;
            let o = if i == 0 { c } else { close[i - 1] };
            bars.open.push(o);
            bars.high.push(c.max(o) + range * 0.5);
            bars.low.push(c.min(o) - range * 0.5);
            bars.volume.push(1000.0 + (i as f64 * 100.0));
        }
        bars
    }

    /// The five columns in OHLCV order.
    pub fn arrays(&self) -> [&[f64]; 5] {
        [
            self.open.as_slice(),
            self.high.as_slice(),
            self.low.as_slice(),
            self.close.as_slice(),
            self.volume.as_slice(),
        ]
    }
}

// ============================================================================
// Test Macros
// ============================================================================

/// Assert that a matrix column equals an expected series within tolerance.
#[macro_export]
macro_rules! assert_column_eq {
    ($matrix:expr, $label:expr, $expected:expr) => {
        $crate::assert_column_eq!($matrix, $label, $expected, 1e-9)
    };
    ($matrix:expr, $label:expr, $expected:expr, $epsilon:expr) => {{
        let label: &str = $label;
        let column = $matrix
            .column_by_label(label)
            .unwrap_or_else(|| panic!("matrix has no '{}' column", label));
        $crate::common::assert_series_eq(column, $expected, $epsilon, label);
    }};
}

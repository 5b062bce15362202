//! Interop boundary.
//!
//! Callers hand over named, borrowed `f64` arrays and get back a newly
//! allocated matrix. Input arrays are wrapped in place, never copied; the
//! output matrix is allocated once per run and never resized.

use serde::{Deserialize, Serialize};
use ta_core::{FeatureMatrix, Result, SeriesSet};

use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;
use crate::request::IndicatorRequest;

/// Memory order of an exported matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Column `k` is contiguous: `data[k * rows + i]`.
    #[default]
    ColumnMajor,
    /// Row `i` is contiguous: `data[i * cols + k]`.
    RowMajor,
}

/// A feature matrix flattened for hand-off to a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixBuffer {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Memory order of `data`.
    pub layout: Layout,
    /// Column labels in column order.
    pub labels: Vec<String>,
    /// `rows * cols` values in `layout` order.
    pub data: Vec<f64>,
}

impl MatrixBuffer {
    /// Value at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let index = match self.layout {
            Layout::ColumnMajor => col * self.rows + row,
            Layout::RowMajor => row * self.cols + col,
        };
        self.data.get(index).copied()
    }
}

/// Flatten `matrix` into `layout`.
///
/// Column-major export moves the matrix storage without copying; row-major
/// export makes one new allocation.
#[must_use]
pub fn export(matrix: FeatureMatrix, layout: Layout) -> MatrixBuffer {
    let (rows, cols) = matrix.shape();
    let labels = matrix.labels().to_vec();
    let data = match layout {
        Layout::ColumnMajor => matrix.into_vec(),
        Layout::RowMajor => matrix.to_row_major(),
    };

    MatrixBuffer {
        rows,
        cols,
        layout,
        labels,
        data,
    }
}

/// Entry point for callers holding plain arrays.
///
/// # Example
///
/// ```
/// use ta_pipeline::{FeatureEngine, IndicatorRequest, Layout};
///
/// let close = [44.0, 44.25, 44.5, 43.75, 44.5, 44.75];
/// let engine = FeatureEngine::default();
///
/// let matrix = engine
///     .compute(&[("close", &close)], &[IndicatorRequest::new("rsi", 5)])
///     .unwrap();
/// let buffer = FeatureEngine::export(matrix, Layout::RowMajor);
///
/// assert_eq!((buffer.rows, buffer.cols), (6, 1));
/// assert!(buffer.get(4, 0).unwrap().is_nan());
/// ```
#[derive(Debug, Default)]
pub struct FeatureEngine {
    pipeline: Pipeline,
}

impl FeatureEngine {
    /// Create an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
        })
    }

    /// Wrap an existing pipeline.
    #[must_use]
    pub fn from_pipeline(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// The underlying pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Compute the requested features from named views such as
    /// `("close", &closes)`.
    ///
    /// # Errors
    ///
    /// Returns a shape error for unknown names, empty or mismatched views,
    /// and any error [`Pipeline::run`] reports.
    pub fn compute(
        &self,
        views: &[(&str, &[f64])],
        requests: &[IndicatorRequest],
    ) -> Result<FeatureMatrix> {
        let series = SeriesSet::from_views(views)?;
        self.pipeline.run(&series, requests)
    }

    /// Compute the requested features from a full OHLCV set.
    ///
    /// # Errors
    ///
    /// Same as [`FeatureEngine::compute`].
    pub fn compute_ohlcv(
        &self,
        ohlcv: [&[f64]; 5],
        requests: &[IndicatorRequest],
    ) -> Result<FeatureMatrix> {
        let [open, high, low, close, volume] = ohlcv;
        let series = SeriesSet::from_ohlcv(open, high, low, close, volume)?;
        self.pipeline.run(&series, requests)
    }

    /// Flatten a computed matrix into `layout`.
    #[must_use]
    pub fn export(matrix: FeatureMatrix, layout: Layout) -> MatrixBuffer {
        export(matrix, layout)
    }
}

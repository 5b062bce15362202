//! Dense feature matrix assembled by a pipeline run.
//!
//! [`FeatureMatrix`] stores N rows by K columns of `f64` in one contiguous,
//! column-major allocation. Column `k` occupies `data[k*N .. (k+1)*N]`, so a
//! column can be handed to a worker as an exclusive `&mut [f64]` chunk while
//! other workers fill their own columns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// An N x K matrix of features, one labelled column per request.
///
/// Column order is request order, row order is chronological. Labels may
/// repeat: duplicate requests produce independent columns.
///
/// With the `serde` feature, deserialization goes through
/// [`FeatureMatrix::from_column_major`], so a payload whose `data` does not
/// hold `rows * labels.len()` values is rejected. `null` cells read as NaN,
/// which is how JSON writers encode NaN.
///
/// # Example
///
/// ```rust
/// use ta_core::FeatureMatrix;
///
/// let labels = vec!["a".to_string(), "b".to_string()];
/// let m = FeatureMatrix::from_column_major(3, labels, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
///
/// assert_eq!(m.rows(), 3);
/// assert_eq!(m.cols(), 2);
/// assert_eq!(m.column(1), &[4.0, 5.0, 6.0]);
/// assert_eq!(m.get(2, 0), Some(3.0));
/// assert_eq!(m.to_row_major(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFeatureMatrix"))]
pub struct FeatureMatrix {
    rows: usize,
    labels: Vec<String>,
    data: Vec<f64>,
}

/// Unchecked wire form of a [`FeatureMatrix`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawFeatureMatrix {
    rows: usize,
    labels: Vec<String>,
    data: Vec<Option<f64>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFeatureMatrix> for FeatureMatrix {
    type Error = EngineError;

    fn try_from(raw: RawFeatureMatrix) -> Result<Self> {
        let data = raw.data.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Self::from_column_major(raw.rows, raw.labels, data)
    }
}

impl FeatureMatrix {
    /// Wrap column-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MatrixShape`] if `data.len() != rows * labels.len()`.
    pub fn from_column_major(rows: usize, labels: Vec<String>, data: Vec<f64>) -> Result<Self> {
        let expected = rows * labels.len();
        if data.len() != expected {
            return Err(EngineError::MatrixShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, labels, data })
    }

    /// Number of rows (observations).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (features).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.labels.len()
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols())
    }

    /// Column labels in column order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column `k` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `k >= cols()`.
    #[must_use]
    pub fn column(&self, k: usize) -> &[f64] {
        &self.data[k * self.rows..(k + 1) * self.rows]
    }

    /// First column with the given label.
    #[must_use]
    pub fn column_by_label(&self, label: &str) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|k| self.column(k))
    }

    /// Iterate over `(label, column)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.labels
            .iter()
            .enumerate()
            .map(move |(k, l)| (l.as_str(), self.column(k)))
    }

    /// Value at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols() {
            return None;
        }
        Some(self.data[col * self.rows + row])
    }

    /// Row `i` across all columns.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.cols()).map(|k| self.data[k * self.rows + i]).collect()
    }

    /// Column-major storage.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix and return its column-major storage.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Copy into a new row-major buffer.
    #[must_use]
    pub fn to_row_major(&self) -> Vec<f64> {
        let cols = self.cols();
        let mut out = vec![f64::NAN; self.data.len()];
        for (k, column) in self.data.chunks_exact(self.rows.max(1)).enumerate() {
            for (i, &v) in column.iter().enumerate() {
                out[i * cols + k] = v;
            }
        }
        out
    }

    /// Count NaN cells in column `k`.
    #[must_use]
    pub fn nan_count(&self, k: usize) -> usize {
        self.column(k).iter().filter(|x| x.is_nan()).count()
    }

    /// Bit-for-bit equality, treating identical NaN payloads as equal.
    ///
    /// `PartialEq` follows IEEE semantics (NaN != NaN); this is the check to use
    /// when asserting that two runs produced identical output.
    #[must_use]
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.labels == other.labels
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

//! Borrowed time series views.
//!
//! The [`SeriesBuffer`] type is a read-only view over caller-owned,
//! contiguous `f64` data. Building one never copies the underlying memory;
//! the borrow checker keeps the caller's array alive and unmutated for as
//! long as any kernel can read it.

use core::ops::Index;

use crate::error::{EngineError, Result};

/// An immutable, non-empty view over a chronologically ordered series.
///
/// Index 0 is the oldest observation.
///
/// # Example
///
/// ```rust
/// use ta_core::series::make_series;
///
/// let closes = vec![100.0, 101.5, 99.8];
/// let series = make_series(&closes, closes.len()).unwrap();
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series[1], 101.5);
/// assert_eq!(series.last(), 99.8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesBuffer<'a> {
    data: &'a [f64],
}

/// Build a [`SeriesBuffer`] from a caller-owned view and its declared length.
///
/// # Errors
///
/// Returns [`EngineError::EmptySeries`] if `length < 1`, and
/// [`EngineError::LengthMismatch`] if `length` disagrees with the view.
pub fn make_series(view: &[f64], length: usize) -> Result<SeriesBuffer<'_>> {
    if length < 1 {
        return Err(EngineError::EmptySeries);
    }
    if view.len() != length {
        return Err(EngineError::LengthMismatch {
            field: "view".to_string(),
            expected: length,
            actual: view.len(),
        });
    }
    Ok(SeriesBuffer { data: view })
}

impl<'a> SeriesBuffer<'a> {
    /// Wrap a slice, taking its length as the series length.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptySeries`] for an empty slice.
    pub fn new(data: &'a [f64]) -> Result<Self> {
        make_series(data, data.len())
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; a buffer holds at least one observation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Get the value at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// Get the most recent value.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.data[self.data.len() - 1]
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        self.data.iter().copied()
    }

    /// Count the number of NaN values.
    #[must_use]
    pub fn nan_count(&self) -> usize {
        self.data.iter().filter(|x| x.is_nan()).count()
    }

    /// Check if the series contains any NaN values.
    #[must_use]
    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|x| x.is_nan())
    }
}

impl Index<usize> for SeriesBuffer<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> IntoIterator for &SeriesBuffer<'a> {
    type Item = &'a f64;
    type IntoIter = core::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a> TryFrom<&'a [f64]> for SeriesBuffer<'a> {
    type Error = EngineError;

    fn try_from(data: &'a [f64]) -> Result<Self> {
        Self::new(data)
    }
}

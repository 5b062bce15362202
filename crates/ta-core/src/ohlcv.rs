//! OHLCV fields and the series set shared by one pipeline run.
//!
//! A [`SeriesSet`] groups the price and volume buffers a run may read. All
//! buffers in a set share one length; a buffer of any other length is
//! rejected rather than truncated or padded.

use core::fmt;
use core::str::FromStr;

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::series::SeriesBuffer;

/// One of the OHLCV input columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Field {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// Traded volume.
    Volume,
}

impl Field {
    /// All fields in canonical OHLCV order.
    pub const ALL: [Field; 5] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];

    /// Lowercase name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "o" => Ok(Field::Open),
            "high" | "h" => Ok(Field::High),
            "low" | "l" => Ok(Field::Low),
            "close" | "c" => Ok(Field::Close),
            "volume" | "v" => Ok(Field::Volume),
            _ => Err(EngineError::UnknownField(s.to_string())),
        }
    }
}

/// Equal-length input buffers for one pipeline run, keyed by [`Field`].
///
/// Iteration follows insertion order.
///
/// # Example
///
/// ```rust
/// use ta_core::{Field, SeriesSet};
///
/// let high = [10.0, 11.0, 12.0];
/// let close = [9.5, 10.5, 11.5];
///
/// let set = SeriesSet::new()
///     .with(Field::High, &high)
///     .and_then(|s| s.with(Field::Close, &close))
///     .unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(Field::Close));
/// assert!(!set.contains(Field::Volume));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SeriesSet<'a> {
    buffers: IndexMap<Field, SeriesBuffer<'a>>,
}

impl<'a> SeriesSet<'a> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffers: IndexMap::with_capacity(Field::ALL.len()),
        }
    }

    /// Build a set from the five OHLCV views.
    ///
    /// # Errors
    ///
    /// Returns a shape error if any view is empty or the lengths differ.
    pub fn from_ohlcv(
        open: &'a [f64],
        high: &'a [f64],
        low: &'a [f64],
        close: &'a [f64],
        volume: &'a [f64],
    ) -> Result<Self> {
        Self::new()
            .with(Field::Open, open)?
            .with(Field::High, high)?
            .with(Field::Low, low)?
            .with(Field::Close, close)?
            .with(Field::Volume, volume)
    }

    /// Build a set from named views such as `("close", &closes)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownField`] for a name that is not an OHLCV
    /// field, or a shape error for empty or mismatched views.
    pub fn from_views(views: &[(&str, &'a [f64])]) -> Result<Self> {
        let mut set = Self::new();
        for &(name, view) in views {
            let field: Field = name.parse()?;
            set.insert(field, SeriesBuffer::new(view)?)?;
        }
        Ok(set)
    }

    /// Add a view for `field` (builder pattern).
    ///
    /// # Errors
    ///
    /// Returns a shape error if the view is empty or its length disagrees
    /// with buffers already in the set.
    pub fn with(mut self, field: Field, view: &'a [f64]) -> Result<Self> {
        self.insert(field, SeriesBuffer::new(view)?)?;
        Ok(self)
    }

    /// Insert or replace the buffer for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LengthMismatch`] if the buffer length differs
    /// from the set's length.
    pub fn insert(&mut self, field: Field, buffer: SeriesBuffer<'a>) -> Result<()> {
        if let Some((_, existing)) = self.buffers.iter().find(|(f, _)| **f != field) {
            if existing.len() != buffer.len() {
                return Err(EngineError::LengthMismatch {
                    field: field.to_string(),
                    expected: existing.len(),
                    actual: buffer.len(),
                });
            }
        }

        self.buffers.insert(field, buffer);
        Ok(())
    }

    /// Number of rows shared by every buffer, or 0 for an empty set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.values().next().map_or(0, SeriesBuffer::len)
    }

    /// Returns `true` if the set holds no buffers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Check if a field is present.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.buffers.contains_key(&field)
    }

    /// Get the buffer for a field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<SeriesBuffer<'a>> {
        self.buffers.get(&field).copied()
    }

    /// Get the buffer a kernel needs, failing with a shape error if absent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingField`] naming `kernel` and `field`.
    pub fn require(&self, kernel: &str, field: Field) -> Result<SeriesBuffer<'a>> {
        self.get(field).ok_or_else(|| EngineError::MissingField {
            kernel: kernel.to_string(),
            field,
        })
    }

    /// Fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        self.buffers.keys().copied().collect()
    }

    /// Returns an iterator over (field, buffer) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, SeriesBuffer<'a>)> + '_ {
        self.buffers.iter().map(|(f, b)| (*f, *b))
    }
}

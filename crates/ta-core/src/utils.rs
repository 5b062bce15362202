//! Numeric building blocks shared by the indicator kernels.
//!
//! The rolling helpers here keep running state so a full pass over a series
//! costs O(N) regardless of the window length.

/// Smoothing factor of a standard EMA: `2 / (period + 1)`.
#[must_use]
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One step of Wilder's recurrence: `(avg * (period - 1) + current) / period`.
#[must_use]
pub fn wilder_step(avg: f64, current: f64, period: usize) -> f64 {
    let n = period as f64;
    (avg * (n - 1.0) + current) / n
}

/// True range of a bar given the previous close.
///
/// `max(high - low, |high - prev_close|, |low - prev_close|)`. Any NaN input
/// yields NaN.
#[must_use]
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    if hl.is_nan() || hc.is_nan() || lc.is_nan() {
        return f64::NAN;
    }
    hl.max(hc).max(lc)
}

/// Fill a column with NaN.
pub fn fill_nan(out: &mut [f64]) {
    out.fill(f64::NAN);
}

/// Removing a value whose squared deviation exceeds the remaining sum of
/// squares by this factor triggers a rebuild (2^20).
const CANCELLATION_RATIO: f64 = 1_048_576.0;

/// Running sum and sum of squares over a trailing window.
///
/// Sums are kept on deviations from an anchor value taken from the window,
/// so the variance does not cancel away when the level is large and the
/// spread small. Non-finite values are tracked by count instead of entering
/// the sums, so a NaN only affects windows that contain it. A run of
/// bitwise-identical values spanning the whole window is detected directly,
/// which makes the mean of such a window exactly the repeated value and its
/// deviation exactly zero.
///
/// Subtracting values out of the sums leaves rounding residue behind. The
/// state reports [`RollingMoments::needs_rebuild`] once every `period`
/// updates, and immediately after a value that dominated the sums leaves the
/// window; [`RollingMoments::rebuild`] then recomputes the sums exactly from
/// the current window. Both triggers keep a full pass O(N) amortized.
///
/// # Example
///
/// ```rust
/// use ta_core::utils::RollingMoments;
///
/// let data = [2.0, 4.0, 4.0, 4.0, 5.0];
/// let mut moments = RollingMoments::new(3);
///
/// for (i, &x) in data.iter().enumerate() {
///     let outgoing = if i >= 3 { Some(data[i - 3]) } else { None };
///     moments.update(x, outgoing);
///     if i >= 2 && moments.needs_rebuild() {
///         moments.rebuild(&data[i - 2..=i]);
///     }
/// }
///
/// // Last window: 4, 4, 5
/// assert!((moments.mean() - 13.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct RollingMoments {
    period: usize,
    anchor: f64,
    sum: f64,
    sum_sq: f64,
    invalid: usize,
    flat_run: usize,
    last: f64,
    since_rebuild: usize,
    stale: bool,
}

impl RollingMoments {
    /// Create empty running state for a window of `period` values.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self {
            period,
            anchor: f64::NAN,
            sum: 0.0,
            sum_sq: 0.0,
            invalid: 0,
            flat_run: 0,
            last: f64::NAN,
            since_rebuild: 0,
            stale: false,
        }
    }

    /// Slide the window: drop `outgoing` (if the window was full) and add
    /// `incoming`.
    pub fn update(&mut self, incoming: f64, outgoing: Option<f64>) {
        let mut removed_sq = 0.0;
        if let Some(old) = outgoing {
            if old.is_finite() {
                let d = old - self.anchor;
                self.sum -= d;
                self.sum_sq -= d * d;
                removed_sq = d * d;
            } else {
                self.invalid -= 1;
            }
        }

        if incoming.is_finite() {
            if self.anchor.is_nan() {
                self.anchor = incoming;
            }
            let d = incoming - self.anchor;
            self.sum += d;
            self.sum_sq += d * d;
            self.flat_run = if incoming == self.last {
                self.flat_run + 1
            } else {
                1
            };
        } else {
            self.invalid += 1;
            self.flat_run = 0;
        }
        self.last = incoming;

        self.since_rebuild += 1;
        if self.since_rebuild >= self.period
            || removed_sq > CANCELLATION_RATIO * self.sum_sq.max(0.0)
        {
            self.stale = true;
        }
    }

    /// Returns `true` if the running sums should be recomputed from the
    /// window before they are read.
    #[must_use]
    pub fn needs_rebuild(&self) -> bool {
        self.stale
    }

    /// Recompute the running state exactly from `window`, the values
    /// currently covered, oldest first.
    ///
    /// The newest finite value becomes the anchor. The flat-run tracking is
    /// kept, since it depends only on the order values arrived in.
    pub fn rebuild(&mut self, window: &[f64]) {
        if let Some(&anchor) = window.iter().rev().find(|x| x.is_finite()) {
            self.anchor = anchor;
        }

        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.invalid = 0;
        for &x in window {
            if x.is_finite() {
                let d = x - self.anchor;
                self.sum += d;
                self.sum_sq += d * d;
            } else {
                self.invalid += 1;
            }
        }

        self.since_rebuild = 0;
        self.stale = false;
    }

    /// Returns `true` if the current window holds a non-finite value.
    #[must_use]
    pub fn has_invalid(&self) -> bool {
        self.invalid > 0
    }

    /// Returns `true` if every value in the window is the same.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.invalid == 0 && self.flat_run >= self.period
    }

    /// Window mean, NaN if the window contains a non-finite value.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.has_invalid() {
            return f64::NAN;
        }
        if self.is_flat() {
            return self.last;
        }
        self.anchor + self.sum / self.period as f64
    }

    /// Population variance of the window, NaN if it contains a non-finite value.
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.has_invalid() {
            return f64::NAN;
        }
        if self.is_flat() {
            return 0.0;
        }
        let n = self.period as f64;
        let var = (self.sum_sq - self.sum * self.sum / n) / n;
        // Cancellation can leave a tiny negative residue.
        var.max(0.0)
    }

    /// Population standard deviation of the window.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Drive [`RollingMoments`] across `data`, calling `emit(i, &moments)` for
/// every index whose window is full.
///
/// The running state is rebuilt from the window whenever it reports
/// [`RollingMoments::needs_rebuild`], before `emit` sees it. Indices before
/// the first full window are left untouched.
pub fn for_each_window<F>(data: &[f64], period: usize, mut emit: F)
where
    F: FnMut(usize, &RollingMoments),
{
    if period == 0 || data.len() < period {
        return;
    }

    let mut moments = RollingMoments::new(period);
    for (i, &x) in data.iter().enumerate() {
        let outgoing = if i >= period { Some(data[i - period]) } else { None };
        moments.update(x, outgoing);
        if i + 1 >= period {
            if moments.needs_rebuild() {
                moments.rebuild(&data[i + 1 - period..=i]);
            }
            emit(i, &moments);
        }
    }
}

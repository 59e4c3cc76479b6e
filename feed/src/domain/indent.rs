//! Saturating indentation curve for nested replies.
//!
//! `offset(depth) = max_offset * (1 - e^(-curve * depth))`. The offset starts
//! at zero, never decreases, and approaches `max_offset` without reaching it,
//! so arbitrarily deep reply chains stay within the display.

/// Default upper bound for the indentation offset.
pub const DEFAULT_MAX_OFFSET: f64 = 2.0;
/// Default steepness of the curve; larger values saturate sooner.
pub const DEFAULT_CURVE: f64 = 100.0;

/// Bounded indentation function mapping nesting depth to a visual offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndentCurve {
    max_offset: f64,
    curve: f64,
}

impl IndentCurve {
    /// Build a curve; non-finite or negative inputs fall back to the defaults.
    #[must_use]
    pub fn new(max_offset: f64, curve: f64) -> Self {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        Self {
            max_offset: if valid(max_offset) {
                max_offset
            } else {
                DEFAULT_MAX_OFFSET
            },
            curve: if valid(curve) { curve } else { DEFAULT_CURVE },
        }
    }

    /// Upper bound approached by deep nesting.
    #[must_use]
    pub const fn max_offset(&self) -> f64 {
        self.max_offset
    }

    /// Visual offset for a nesting depth.
    ///
    /// # Examples
    /// ```
    /// use feed::domain::IndentCurve;
    ///
    /// let curve = IndentCurve::default();
    /// assert_eq!(curve.offset(0), 0.0);
    /// assert!(curve.offset(1_000) < curve.max_offset());
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "the indentation curve is a float function")]
    pub fn offset(&self, depth: u32) -> f64 {
        if depth == 0 || self.max_offset == 0.0 {
            return 0.0;
        }
        let exponent = -self.curve * f64::from(depth);
        let offset = self.max_offset * -exponent.exp_m1();
        if offset < self.max_offset {
            offset
        } else {
            largest_below(self.max_offset)
        }
    }
}

impl Default for IndentCurve {
    fn default() -> Self {
        Self {
            max_offset: DEFAULT_MAX_OFFSET,
            curve: DEFAULT_CURVE,
        }
    }
}

// Rounding saturates the curve at large depths; clamp to the closest value
// strictly below the bound. `bound` is finite and positive here.
fn largest_below(bound: f64) -> f64 {
    f64::from_bits(bound.to_bits().saturating_sub(1))
}

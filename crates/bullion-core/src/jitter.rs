//! Bounded multiplicative jitter.
//!
//! A factor is drawn uniformly from `[1 - spread, 1 + spread]`. The random
//! source is always passed in so callers can swap entropy for a fixed
//! sequence.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Source of uniform values in `[0, 1]`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// `fastrand`-backed source. Non-reproducible unless seeded.
#[derive(Debug, Clone)]
pub struct FastRandSource {
    rng: fastrand::Rng,
}

impl FastRandSource {
    pub fn entropy() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for FastRandSource {
    fn default() -> Self {
        Self::entropy()
    }
}

impl RandomSource for FastRandSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Cycles through a fixed list of unit values. Values are clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct FixedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always yields 0.5, i.e. a factor of exactly 1.
    pub fn midpoint() -> Self {
        Self::new(vec![0.5])
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        if value.is_nan() {
            0.5
        } else {
            value.clamp(0.0, 1.0)
        }
    }
}

/// Half-width of the jitter band, as a fraction of the baseline.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Spread(f64);

impl Spread {
    /// ±1%.
    pub const DEFAULT: Self = Self(0.01);
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(ValidationError::InvalidSpread { value });
        }
        Ok(Self(value))
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Half the spread, used for the change statistics.
    pub fn dampened(self) -> Self {
        Self(self.0 * 0.5)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Inclusive bounds `(1 - spread, 1 + spread)`.
    pub fn bounds(self) -> (f64, f64) {
        (1.0 - self.0, 1.0 + self.0)
    }
}

impl Default for Spread {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Spread {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Spread> for f64 {
    fn from(value: Spread) -> Self {
        value.0
    }
}

/// Draws one multiplicative factor in `[1 - spread, 1 + spread]`.
///
/// A zero spread returns exactly `1.0` without consuming randomness.
pub fn jitter<R: RandomSource + ?Sized>(spread: Spread, rng: &mut R) -> f64 {
    if spread.is_zero() {
        return 1.0;
    }
    let unit = rng.next_unit().clamp(0.0, 1.0);
    1.0 + (2.0 * unit - 1.0) * spread.value()
}

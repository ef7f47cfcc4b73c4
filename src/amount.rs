//! A validated monetary amount.

use serde::{Deserialize, Serialize};

use crate::Error;

/// A positive monetary amount, rounded to two decimal places (cents).
///
/// Amounts are stored and compared as `f64` since SQLite has no decimal
/// column type; rounding at construction keeps sub-cent noise out of the
/// database.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount from a raw number.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `value` is not a finite, positive
    /// number after rounding to two decimal places.
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(value));
        }

        let rounded = (value * 100.0).round() / 100.0;

        if rounded <= 0.0 {
            Err(Error::InvalidAmount(value))
        } else {
            Ok(Self(rounded))
        }
    }

    /// Create an amount without validation.
    ///
    /// The caller should ensure that `value` is positive and already rounded,
    /// e.g. a value coming out of the application's database.
    pub fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    /// Cast the amount to a 64 bit float.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

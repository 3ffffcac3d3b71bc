//! # Periodic Series
//!
//! Every low-precision position formula in this crate has the same shape: a
//! sum of sine terms whose arguments advance linearly with time. One evaluator
//! serves all of them; only the coefficient table changes.

use crate::angle::{normalize_angle, sin_deg};
use serde::{Deserialize, Serialize};

/// One row of a perturbation table: `amplitude · sin(phase + rate · jy)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodicTerm {
    /// Amplitude, in the unit of the quantity being summed
    pub amplitude: f64,
    /// Argument at J2000.0, degrees
    pub phase: f64,
    /// Argument rate, degrees per Julian year
    pub rate: f64,
}

impl PeriodicTerm {
    pub const fn new(amplitude: f64, phase: f64, rate: f64) -> Self {
        PeriodicTerm {
            amplitude,
            phase,
            rate,
        }
    }

    /// Value of this term at `jy` Julian years after 2000.0.
    #[inline]
    pub fn value(&self, jy: f64) -> f64 {
        self.amplitude * sin_deg(normalize_angle(self.phase + self.rate * jy))
    }
}

/// Sum a coefficient table at `jy` Julian years after 2000.0.
///
/// Terms are accumulated in table order.
pub fn evaluate_series(terms: &[PeriodicTerm], jy: f64) -> f64 {
    terms.iter().map(|term| term.value(jy)).sum()
}

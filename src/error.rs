//! # Almanac Errors
//!
//! The engine is a set of total functions except for three failure modes:
//! bad observer input, a body that never crosses the horizon threshold on the
//! requested day, and a solver that fails to settle within its iteration cap.

use thiserror::Error;

/// Errors produced by the position engine and the rise/set solver.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AlmanacError {
    /// Latitude, longitude or elevation is outside its physical range
    #[error("invalid observer: {field} = {value}")]
    InvalidObserver { field: &'static str, value: f64 },

    /// The body stays above (or below) the rise/set altitude all day
    #[error("body never rises or sets (always {})", side(.always_above))]
    NeverRisesOrSets { always_above: bool },

    /// Iteration cap reached before the hour-angle correction settled
    #[error(
        "no convergence after {iterations} iterations (last correction {last_correction:.6} d)"
    )]
    NonConvergent {
        iterations: usize,
        last_correction: f64,
    },
}

fn side(always_above: &bool) -> &'static str {
    if *always_above {
        "above"
    } else {
        "below"
    }
}

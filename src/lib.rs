//! # Moon Phase Diary Core Library
//!
//! Low-precision Sun and Moon ephemeris for a diary that wants to know, for a
//! given calendar day and place, the Moon's phase and when the Sun and Moon
//! rise and set.
//!
//! ## Design Philosophy
//!
//! ### Accuracy Budget
//! Positions come from truncated periodic series (a few dozen sine terms per
//! quantity), good to roughly a hundredth of a degree for the Sun and a tenth
//! of a degree for the Moon within the 21st century. That is ample for
//! minute-level rise/set times and a 45° phase bucket.
//!
//! ### Pure Computation
//! Every operation is a deterministic function of its arguments: no clock
//! reads, no caches, no shared state. Calls are safe to run concurrently.
//!
//! ### Data Flow
//! 1. **Time**: local date + UTC offset → days since J2000 → Julian years `jy`
//! 2. **Ephemeris**: `jy` → ecliptic longitude/latitude/distance → right
//!    ascension/declination
//! 3. **Solver**: iterate hour angle against local sidereal time until the
//!    correction drops below 0.00005 day
//! 4. **Report**: phase bucket + four `HH:MM:SS` strings
//!
//! ## Core Types
//! - [`Observer`]: validated latitude/longitude/elevation
//! - [`DailyPhaseReport`]: the flat per-day record
//! - [`DailyAlmanac`]: the same day with typed outcomes and transits

use serde::{Deserialize, Serialize};

pub mod angle;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod observer;
pub mod phase;
pub mod renderer;
pub mod report;
pub mod series;
pub mod solver;
pub mod tables;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::AlmanacError;
pub use observer::Observer;
pub use phase::{MoonPhase, PhaseName};
pub use report::{
    body_position, compute_daily_almanac, compute_daily_report, compute_daily_report_for,
    position_at, BodyEvents, BodyPosition, DailyAlmanac, EventOutcome,
};
pub use solver::{solve, Body, EventTime, RiseSetEvent};
pub use time::LocalDay;

/// One diary day: phase bucket plus Sun and Moon rise/set clocks.
///
/// Times are local `HH:MM:SS` strings. An event that does not happen on this
/// date (the Moon skips one rise and one set each month) or cannot happen
/// (polar day/night) reads `00:00:00`; an event the solver could not pin
/// down reads `--:--:--`.
///
/// The phase bucket is 0–7, with 0 new, 2 first quarter, 4 full and 6 last
/// quarter.
///
/// # Example
/// ```
/// use moon_phase_lib::DailyPhaseReport;
///
/// let report = DailyPhaseReport {
///     date_label: "1/1".to_string(),
///     moon_phase: 5,
///     moon_rise: "21:50:37".to_string(),
///     moon_set: "10:31:56".to_string(),
///     sun_rise: "07:07:41".to_string(),
///     sun_set: "16:58:42".to_string(),
/// };
///
/// let json = serde_json::to_string(&report).unwrap();
/// assert!(json.contains("\"dateLabel\":\"1/1\""));
/// assert!(json.contains("\"moonPhase\":5"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPhaseReport {
    /// `M/d`, no zero padding
    pub date_label: String,
    /// Phase bucket 0–7
    pub moon_phase: u8,
    pub moon_rise: String,
    pub moon_set: String,
    pub sun_rise: String,
    pub sun_set: String,
}

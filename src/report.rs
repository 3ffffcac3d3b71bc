//! # Daily Almanac Assembly
//!
//! The one entry point the rest of an application needs: give it an instant
//! (date, time and UTC offset) and an [`Observer`], get back the Moon's phase
//! and the day's rise, set and transit times for the Sun and Moon.
//!
//! Two result shapes are offered:
//! - [`DailyAlmanac`]: typed outcomes, distinguishing "no moonrise today" from
//!   polar day/night and from a solver that failed to settle
//! - [`DailyPhaseReport`]: the flat string record used for display and
//!   storage, where any missing event reads `00:00:00`

use crate::ephemeris::{self, EclipticCoordinate, EquatorialCoordinate, HorizontalCoordinate};
use crate::error::AlmanacError;
use crate::observer::Observer;
use crate::phase::{moon_phase, MoonPhase};
use crate::solver::{solve, Body, EventTime, RiseSetEvent};
use crate::time::{day_fraction, format_clock, LocalDay};
use crate::DailyPhaseReport;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Placeholder clock for an event whose time could not be determined.
pub const UNKNOWN_CLOCK: &str = "--:--:--";

/// What happened to one event on one day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventOutcome {
    /// Local time as a fraction of the day
    Occurs(f64),
    /// The event belongs to the previous or next day
    DoesNotOccur,
    /// Polar day or night for this body
    NeverRisesOrSets { always_above: bool },
    /// The solver hit its iteration cap
    Unknown,
}

impl EventOutcome {
    pub fn day_fraction(&self) -> Option<f64> {
        match self {
            EventOutcome::Occurs(t) => Some(*t),
            _ => None,
        }
    }

    /// `HH:MM:SS`; `00:00:00` when there is no event and `--:--:--` when unknown.
    pub fn to_clock(&self) -> String {
        match self {
            EventOutcome::Occurs(t) => format_clock(*t),
            EventOutcome::DoesNotOccur | EventOutcome::NeverRisesOrSets { .. } => {
                format_clock(0.0)
            }
            EventOutcome::Unknown => UNKNOWN_CLOCK.to_string(),
        }
    }
}

impl From<Result<EventTime, AlmanacError>> for EventOutcome {
    fn from(result: Result<EventTime, AlmanacError>) -> Self {
        match result {
            Ok(EventTime::Occurs(t)) => EventOutcome::Occurs(t),
            Ok(EventTime::DoesNotOccur) => EventOutcome::DoesNotOccur,
            Err(AlmanacError::NeverRisesOrSets { always_above }) => {
                EventOutcome::NeverRisesOrSets { always_above }
            }
            Err(_) => EventOutcome::Unknown,
        }
    }
}

/// Rise, set and transit of one body on one day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyEvents {
    pub rise: EventOutcome,
    pub set: EventOutcome,
    pub transit: EventOutcome,
}

impl BodyEvents {
    /// Run the solver for all three events of `body`.
    pub fn solve(body: Body, day: &LocalDay, observer: &Observer) -> Self {
        let run = |event| EventOutcome::from(solve(body, event, day, observer));
        BodyEvents {
            rise: run(RiseSetEvent::Rise),
            set: run(RiseSetEvent::Set),
            transit: run(RiseSetEvent::Transit),
        }
    }
}

/// Everything computed for one local date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyAlmanac {
    pub date: NaiveDate,
    pub utc_offset_hours: f64,
    pub observer: Observer,
    pub phase: MoonPhase,
    pub sun: BodyEvents,
    pub moon: BodyEvents,
}

impl DailyAlmanac {
    /// Short `M/d` label, e.g. `1/1`.
    pub fn date_label(&self) -> String {
        self.date.format("%-m/%-d").to_string()
    }

    /// Flatten into the string report.
    pub fn to_report(&self) -> DailyPhaseReport {
        DailyPhaseReport {
            date_label: self.date_label(),
            moon_phase: self.phase.index,
            moon_rise: self.moon.rise.to_clock(),
            moon_set: self.moon.set.to_clock(),
            sun_rise: self.sun.rise.to_clock(),
            sun_set: self.sun.set.to_clock(),
        }
    }
}

/// Compute the almanac for the local date of `instant`.
///
/// Rise/set/transit times are solved over the whole local day; the phase is
/// taken at the instant's own time of day.
pub fn compute_daily_almanac(instant: &DateTime<FixedOffset>, observer: &Observer) -> DailyAlmanac {
    let day = LocalDay::of_instant(instant);
    let jy = day.julian_years(day_fraction(instant.time()));

    DailyAlmanac {
        date: day.date(),
        utc_offset_hours: day.utc_offset_hours(),
        observer: *observer,
        phase: moon_phase(jy),
        sun: BodyEvents::solve(Body::Sun, &day, observer),
        moon: BodyEvents::solve(Body::Moon, &day, observer),
    }
}

/// Compute the flat daily report for the local date of `instant`.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use moon_phase_lib::{compute_daily_report, Observer};
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let instant = jst.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let akashi = Observer::new(35.0, 135.0, 0.0).unwrap();
///
/// let report = compute_daily_report(&instant, &akashi);
/// assert_eq!(report.date_label, "1/1");
/// assert!(report.sun_rise.starts_with("07:"));
/// ```
pub fn compute_daily_report(
    instant: &DateTime<FixedOffset>,
    observer: &Observer,
) -> DailyPhaseReport {
    compute_daily_almanac(instant, observer).to_report()
}

/// [`compute_daily_report`] from raw coordinates.
///
/// # Errors
/// [`AlmanacError::InvalidObserver`] for out-of-range coordinates.
pub fn compute_daily_report_for(
    instant: &DateTime<FixedOffset>,
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
) -> Result<DailyPhaseReport, AlmanacError> {
    let observer = Observer::new(latitude, longitude, elevation_m)?;
    Ok(compute_daily_report(instant, &observer))
}

/// A body's position at one instant, in all three frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub ecliptic: EclipticCoordinate,
    pub equatorial: EquatorialCoordinate,
    pub horizontal: HorizontalCoordinate,
}

/// Where `body` stands in the observer's sky at local time `t` of `day`.
pub fn body_position(body: Body, day: &LocalDay, observer: &Observer, t: f64) -> BodyPosition {
    let jy = day.julian_years(t);
    let ecliptic = body.ecliptic(jy);
    let equatorial = ephemeris::ecliptic_to_equatorial(ecliptic, jy);
    let sidereal = ephemeris::sidereal_time(jy, t, observer.longitude(), day.utc_offset_hours());

    BodyPosition {
        ecliptic,
        equatorial,
        horizontal: ephemeris::equatorial_to_horizontal(equatorial, sidereal, observer.latitude()),
    }
}

/// [`body_position`] at an instant.
pub fn position_at(
    body: Body,
    instant: &DateTime<FixedOffset>,
    observer: &Observer,
) -> BodyPosition {
    let day = LocalDay::of_instant(instant);
    body_position(body, &day, observer, day_fraction(instant.time()))
}

//! # Rise, Set and Transit Solver
//!
//! Finds the local time of day at which a body's hour angle reaches the value
//! that defines an event: zero for the meridian transit, or the hour angle at
//! which the body crosses its rise/set altitude.
//!
//! ## Iteration
//! Starting from local noon (`t = 0.5`), each step
//! 1. recomputes the body's equatorial position at `t`,
//! 2. measures the hour-angle error `dt = target - (sidereal - α)` wrapped into ±180°,
//! 3. advances `t` by `dt / 360` for the Sun or `dt / 347.8` for the Moon,
//!    whose eastward drift against the stars slows its apparent daily motion.
//!
//! The loop stops once the correction drops to 0.00005 d (about 4 s). It is
//! capped at [`MAX_ITERATIONS`]; running out is reported as
//! [`AlmanacError::NonConvergent`] rather than looping forever.
//!
//! ## Circumpolar limit
//! An out-of-range `acos` argument at the current guess does not prove the
//! body stays up or down all day. Before reporting
//! [`AlmanacError::NeverRisesOrSets`], the solver scans the day for a
//! horizon crossing and bisects any it finds.
//!
//! ## Lunar day boundary
//! The Moon rises about 50 minutes later each day, so once a month it has no
//! rise (or set) on a given local date. When the converged Moon time falls
//! outside `[0, 1)` the event is reported as [`EventTime::DoesNotOccur`].

use crate::angle::{cos_deg, sin_deg, wrap_signed, DEG};
use crate::ephemeris::{self, EclipticCoordinate, EquatorialCoordinate, HORIZON_REFRACTION};
use crate::error::AlmanacError;
use crate::observer::Observer;
use crate::time::{format_clock, LocalDay};
use serde::{Deserialize, Serialize};

/// Correction size at which the iteration is considered settled, days.
pub const CONVERGENCE: f64 = 0.00005;

/// Default iteration cap.
pub const MAX_ITERATIONS: usize = 50;

/// First guess for every event: local noon.
const INITIAL_GUESS: f64 = 0.5;

/// Grid points per day when scanning for a horizon crossing (5 minutes).
const SCAN_STEPS: usize = 288;

/// Hour-angle degrees per day of apparent lunar motion.
const MOON_DEGREES_PER_DAY: f64 = 347.8;

/// Celestial body handled by the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
}

/// Horizon event to solve for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiseSetEvent {
    Rise,
    Set,
    Transit,
}

/// Outcome of a converged solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    /// Event happens at this local time, as a fraction of the day
    Occurs(f64),
    /// Event falls outside the local day (Moon only)
    DoesNotOccur,
}

impl EventTime {
    /// The day fraction, if the event happens.
    pub fn day_fraction(self) -> Option<f64> {
        match self {
            EventTime::Occurs(t) => Some(t),
            EventTime::DoesNotOccur => None,
        }
    }

    /// `HH:MM:SS`, or `00:00:00` when the event does not occur.
    pub fn to_clock(self) -> String {
        format_clock(self.day_fraction().unwrap_or(0.0))
    }
}

/// Iteration limits, passed by value into each solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverSettings {
    pub max_iterations: usize,
    pub convergence: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            max_iterations: MAX_ITERATIONS,
            convergence: CONVERGENCE,
        }
    }
}

impl Body {
    /// Ecliptic position at `jy`.
    pub fn ecliptic(self, jy: f64) -> EclipticCoordinate {
        match self {
            Body::Sun => ephemeris::sun_ecliptic(jy),
            Body::Moon => ephemeris::moon_ecliptic(jy),
        }
    }

    /// Equatorial position at `jy`.
    pub fn equatorial(self, jy: f64) -> EquatorialCoordinate {
        ephemeris::ecliptic_to_equatorial(self.ecliptic(jy), jy)
    }

    /// Geometric altitude of the body's centre at the moment of rise or set.
    ///
    /// Sun: upper limb on the horizon, so the semi-diameter is included.
    /// Moon: centre on the horizon. Both are lowered by refraction and the
    /// observer's horizon dip, and raised by parallax.
    pub fn rise_set_altitude(self, jy: f64, observer: &Observer) -> f64 {
        match self {
            Body::Sun => {
                let distance = ephemeris::sun_distance(jy);
                -ephemeris::sun_apparent_radius(distance) - HORIZON_REFRACTION
                    - observer.horizon_dip()
                    + ephemeris::sun_parallax(distance)
            }
            Body::Moon => {
                -HORIZON_REFRACTION - observer.horizon_dip() + ephemeris::moon_parallax(jy)
            }
        }
    }

    fn degrees_per_day(self) -> f64 {
        match self {
            Body::Sun => 360.0,
            Body::Moon => MOON_DEGREES_PER_DAY,
        }
    }

    fn finish(self, t: f64) -> EventTime {
        match self {
            Body::Moon if !(0.0..1.0).contains(&t) => EventTime::DoesNotOccur,
            _ => EventTime::Occurs(t),
        }
    }
}

/// Hour angle at which the event happens, degrees.
///
/// Rise is the negative root (east of the meridian), set the positive root.
///
/// # Errors
/// [`AlmanacError::NeverRisesOrSets`] when the body never reaches `altitude`
/// on this declination and latitude.
pub fn target_hour_angle(
    event: RiseSetEvent,
    altitude: f64,
    declination: f64,
    latitude: f64,
) -> Result<f64, AlmanacError> {
    if event == RiseSetEvent::Transit {
        return Ok(0.0);
    }

    let cos_hour_angle = (sin_deg(altitude) - sin_deg(declination) * sin_deg(latitude))
        / (cos_deg(declination) * cos_deg(latitude));
    if !cos_hour_angle.is_finite() || cos_hour_angle.abs() > 1.0 {
        return Err(AlmanacError::NeverRisesOrSets {
            always_above: cos_hour_angle < -1.0,
        });
    }

    let hour_angle = cos_hour_angle.acos() / DEG;
    Ok(match event {
        RiseSetEvent::Rise => -hour_angle,
        _ => hour_angle,
    })
}

/// Difference between the target hour angle and the body's hour angle,
/// wrapped into [-180, 180).
pub fn hour_angle_error(target: f64, sidereal: f64, right_ascension: f64) -> f64 {
    wrap_signed(target - (sidereal - right_ascension))
}

/// Solve for `event` of `body` on `day` with the default iteration limits.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use moon_phase_lib::solver::{solve, Body, EventTime, RiseSetEvent};
/// use moon_phase_lib::{LocalDay, Observer};
///
/// let day = LocalDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 9.0);
/// let akashi = Observer::new(35.0, 135.0, 0.0).unwrap();
///
/// let sunrise = solve(Body::Sun, RiseSetEvent::Rise, &day, &akashi).unwrap();
/// assert!(matches!(sunrise, EventTime::Occurs(t) if t > 0.25 && t < 0.33));
/// ```
pub fn solve(
    body: Body,
    event: RiseSetEvent,
    day: &LocalDay,
    observer: &Observer,
) -> Result<EventTime, AlmanacError> {
    solve_with(SolverSettings::default(), body, event, day, observer)
}

/// Solve for `event` of `body` on `day` with explicit iteration limits.
///
/// The iteration judges "never rises or sets" from the declination at its
/// current guess. Near the circumpolar limit the Moon's declination moves
/// enough within a day to cross that limit, so such a verdict is checked by
/// scanning the day for a horizon crossing before it is returned.
pub fn solve_with(
    settings: SolverSettings,
    body: Body,
    event: RiseSetEvent,
    day: &LocalDay,
    observer: &Observer,
) -> Result<EventTime, AlmanacError> {
    match iterate(settings, body, event, day, observer) {
        Err(never @ AlmanacError::NeverRisesOrSets { .. }) => {
            match scan_for_crossing(settings, body, event, day, observer) {
                Some(t) => {
                    log::debug!(
                        "{body:?} {event:?} on {} found by scanning at t = {t:.6}",
                        day.date()
                    );
                    Ok(body.finish(t))
                }
                None => Err(never),
            }
        }
        other => other,
    }
}

fn iterate(
    settings: SolverSettings,
    body: Body,
    event: RiseSetEvent,
    day: &LocalDay,
    observer: &Observer,
) -> Result<EventTime, AlmanacError> {
    let mut t = INITIAL_GUESS;
    let mut correction = f64::INFINITY;

    for iteration in 1..=settings.max_iterations {
        let jy = day.julian_years(t);
        let position = body.equatorial(jy);
        let altitude = match event {
            RiseSetEvent::Transit => 0.0,
            _ => body.rise_set_altitude(jy, observer),
        };

        let target = target_hour_angle(event, altitude, position.declination, observer.latitude())?;
        let sidereal =
            ephemeris::sidereal_time(jy, t, observer.longitude(), day.utc_offset_hours());
        let error = hour_angle_error(target, sidereal, position.right_ascension);

        correction = error / body.degrees_per_day();
        t += correction;
        log::trace!(
            "{body:?} {event:?} iteration {iteration}: t = {t:.6}, correction = {correction:.6}"
        );

        if correction.abs() <= settings.convergence {
            log::debug!(
                "{body:?} {event:?} on {} converged after {iteration} iterations",
                day.date()
            );
            return Ok(body.finish(t));
        }
    }

    log::warn!(
        "{body:?} {event:?} on {} did not converge within {} iterations",
        day.date(),
        settings.max_iterations
    );
    Err(AlmanacError::NonConvergent {
        iterations: settings.max_iterations,
        last_correction: correction,
    })
}

/// Geometric altitude of the body's centre minus its rise/set altitude at
/// local time `t`, degrees. Positive while the body is up.
fn height_above_threshold(body: Body, day: &LocalDay, observer: &Observer, t: f64) -> f64 {
    let jy = day.julian_years(t);
    let position = body.equatorial(jy);
    let sidereal = ephemeris::sidereal_time(jy, t, observer.longitude(), day.utc_offset_hours());
    let hour_angle = sidereal - position.right_ascension;
    let latitude = observer.latitude();

    let sin_altitude = sin_deg(position.declination) * sin_deg(latitude)
        + cos_deg(position.declination) * cos_deg(latitude) * cos_deg(hour_angle);
    sin_altitude.clamp(-1.0, 1.0).asin() / DEG - body.rise_set_altitude(jy, observer)
}

/// First rise (or set) within the local day, bracketed on a 5-minute grid
/// and refined by bisection.
fn scan_for_crossing(
    settings: SolverSettings,
    body: Body,
    event: RiseSetEvent,
    day: &LocalDay,
    observer: &Observer,
) -> Option<f64> {
    let rising = match event {
        RiseSetEvent::Rise => true,
        RiseSetEvent::Set => false,
        RiseSetEvent::Transit => return None,
    };
    let is_up = |t: f64| height_above_threshold(body, day, observer, t) > 0.0;

    let mut start = 0.0;
    let mut start_up = is_up(start);
    for step in 1..=SCAN_STEPS {
        let end = step as f64 / SCAN_STEPS as f64;
        let end_up = is_up(end);

        if start_up != end_up && end_up == rising {
            let (mut low, mut high) = (start, end);
            for _ in 0..settings.max_iterations {
                if high - low <= settings.convergence {
                    break;
                }
                let middle = (low + high) / 2.0;
                if is_up(middle) == rising {
                    high = middle;
                } else {
                    low = middle;
                }
            }
            return Some((low + high) / 2.0);
        }

        start = end;
        start_up = end_up;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, utc: f64) -> LocalDay {
        LocalDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), utc)
    }

    fn akashi() -> Observer {
        Observer::new(35.0, 135.0, 0.0).unwrap()
    }

    fn occurs(result: Result<EventTime, AlmanacError>) -> f64 {
        match result {
            Ok(EventTime::Occurs(t)) => t,
            other => panic!("expected an event time, got {other:?}"),
        }
    }

    const ONE_MINUTE: f64 = 1.0 / 1440.0;

    #[test]
    fn test_sun_events_for_japan_new_year() {
        let d = day(2024, 1, 1, 9.0);
        let rise = occurs(solve(Body::Sun, RiseSetEvent::Rise, &d, &akashi()));
        let set = occurs(solve(Body::Sun, RiseSetEvent::Set, &d, &akashi()));
        let transit = occurs(solve(Body::Sun, RiseSetEvent::Transit, &d, &akashi()));

        // 07:07:41, 16:58:42, 12:03:08
        assert!((rise - 0.296_998).abs() < ONE_MINUTE, "rise {rise}");
        assert!((set - 0.707_427).abs() < ONE_MINUTE, "set {set}");
        assert!((transit - 0.502_175).abs() < ONE_MINUTE, "transit {transit}");
    }

    #[test]
    fn test_moon_events_for_japan_new_year() {
        let d = day(2024, 1, 1, 9.0);
        let rise = occurs(solve(Body::Moon, RiseSetEvent::Rise, &d, &akashi()));
        let set = occurs(solve(Body::Moon, RiseSetEvent::Set, &d, &akashi()));
        let transit = occurs(solve(Body::Moon, RiseSetEvent::Transit, &d, &akashi()));

        // 21:50:37, 10:31:56, 03:47:08
        assert!((rise - 0.910_147).abs() < ONE_MINUTE, "rise {rise}");
        assert!((set - 0.438_839).abs() < ONE_MINUTE, "set {set}");
        assert!((transit - 0.157_733).abs() < ONE_MINUTE, "transit {transit}");
    }

    #[test]
    fn test_equinox_at_equator_is_symmetric() {
        let d = day(2024, 3, 20, 0.0);
        let greenwich_equator = Observer::new(0.0, 0.0, 0.0).unwrap();
        let rise = occurs(solve(Body::Sun, RiseSetEvent::Rise, &d, &greenwich_equator));
        let set = occurs(solve(Body::Sun, RiseSetEvent::Set, &d, &greenwich_equator));
        let transit = occurs(solve(Body::Sun, RiseSetEvent::Transit, &d, &greenwich_equator));

        // 06:00/18:00 apparent time, shifted by the equation of time (~7 min)
        assert!((rise - 0.25).abs() < 12.0 * ONE_MINUTE, "rise {rise}");
        assert!((set - 0.75).abs() < 12.0 * ONE_MINUTE, "set {set}");
        let midpoint = (rise + set) / 2.0;
        assert!((midpoint - transit).abs() < 30.0 / 86_400.0);

        // 12 h plus refraction and semi-diameter on both sides
        let length_hours = (set - rise) * 24.0;
        assert!((12.0..12.25).contains(&length_hours), "day length {length_hours}");
    }

    #[test]
    fn test_polar_night_and_midnight_sun() {
        let svalbard = Observer::new(80.0, 15.0, 0.0).unwrap();

        let winter = solve(Body::Sun, RiseSetEvent::Rise, &day(2024, 12, 21, 1.0), &svalbard);
        assert_eq!(
            winter,
            Err(AlmanacError::NeverRisesOrSets {
                always_above: false
            })
        );

        let summer = solve(Body::Sun, RiseSetEvent::Set, &day(2024, 6, 21, 2.0), &svalbard);
        assert_eq!(
            summer,
            Err(AlmanacError::NeverRisesOrSets { always_above: true })
        );

        // transit still happens
        let transit = solve(Body::Sun, RiseSetEvent::Transit, &day(2024, 12, 21, 1.0), &svalbard);
        assert!(transit.is_ok());
    }

    #[test]
    fn test_moon_near_circumpolar_limit_still_rises_and_sets() {
        // the noon declination puts the Moon below the limit, but it is up
        // from 03:45 to 04:57
        let north = Observer::new(62.0, 15.0, 0.0).unwrap();
        let d = day(2024, 3, 31, 1.0);
        let rise = occurs(solve(Body::Moon, RiseSetEvent::Rise, &d, &north));
        let set = occurs(solve(Body::Moon, RiseSetEvent::Set, &d, &north));

        assert!((rise - 0.155_97).abs() < ONE_MINUTE, "rise {rise}");
        assert!((set - 0.206_10).abs() < ONE_MINUTE, "set {set}");
    }

    #[test]
    fn test_brief_lunar_appearance_is_found() {
        // up for about 40 minutes from 14:32
        let south = Observer::new(-64.0, 15.0, 0.0).unwrap();
        let d = day(2024, 6, 9, 1.0);
        let rise = occurs(solve(Body::Moon, RiseSetEvent::Rise, &d, &south));
        assert!((rise - 0.605_6).abs() < 2.0 * ONE_MINUTE, "rise {rise}");
    }

    #[test]
    fn test_pole_reports_never_rises_or_sets() {
        let pole = Observer::new(90.0, 0.0, 0.0).unwrap();
        let result = solve(Body::Sun, RiseSetEvent::Rise, &day(2024, 12, 21, 0.0), &pole);
        assert!(matches!(result, Err(AlmanacError::NeverRisesOrSets { .. })));
    }

    #[test]
    fn test_missing_moonrise_and_moonset() {
        // the Moon rises at 23:42 on Jan 3 and 00:39 on Jan 5
        let rise = solve(Body::Moon, RiseSetEvent::Rise, &day(2024, 1, 4, 9.0), &akashi());
        assert_eq!(rise, Ok(EventTime::DoesNotOccur));

        // sets at 23:47 on Jan 17 and 00:55 on Jan 19
        let set = solve(Body::Moon, RiseSetEvent::Set, &day(2024, 1, 18, 9.0), &akashi());
        assert_eq!(set, Ok(EventTime::DoesNotOccur));
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let settings = SolverSettings {
            max_iterations: 1,
            ..SolverSettings::default()
        };
        let d = day(2024, 1, 1, 9.0);
        let result = solve_with(settings, Body::Sun, RiseSetEvent::Rise, &d, &akashi());
        match result {
            Err(AlmanacError::NonConvergent {
                iterations,
                last_correction,
            }) => {
                assert_eq!(iterations, 1);
                assert!(last_correction.abs() > CONVERGENCE);
            }
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }

    #[test]
    fn test_horizon_dip_moves_sunrise_earlier() {
        let d = day(2024, 1, 1, 9.0);
        let sea = occurs(solve(Body::Sun, RiseSetEvent::Rise, &d, &akashi()));
        let summit = Observer::new(35.0, 135.0, 1000.0).unwrap();
        let high = occurs(solve(Body::Sun, RiseSetEvent::Rise, &d, &summit));
        assert!(high < sea);
    }

    #[test]
    fn test_target_hour_angle_signs() {
        let rise = target_hour_angle(RiseSetEvent::Rise, -0.8, 0.0, 0.0).unwrap();
        let set = target_hour_angle(RiseSetEvent::Set, -0.8, 0.0, 0.0).unwrap();
        assert!(rise < -90.0);
        assert_eq!(set, -rise);
        assert_eq!(target_hour_angle(RiseSetEvent::Transit, -0.8, 80.0, 89.0), Ok(0.0));
    }

    #[test]
    fn test_hour_angle_error_wraps() {
        assert_eq!(hour_angle_error(0.0, 10.0, 0.0), -10.0);
        assert_eq!(hour_angle_error(0.0, 350.0, 0.0), 10.0);
        assert_eq!(hour_angle_error(-90.0, 300.0, 10.0), -20.0);
        let e = hour_angle_error(95.0, 0.0, 300.0);
        assert!((-180.0..180.0).contains(&e));
    }

    #[test]
    fn test_event_time_clock() {
        assert_eq!(EventTime::Occurs(0.75).to_clock(), "18:00:00");
        assert_eq!(EventTime::DoesNotOccur.to_clock(), "00:00:00");
        assert_eq!(EventTime::DoesNotOccur.day_fraction(), None);
    }
}

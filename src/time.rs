//! # Calendar and Time Scales
//!
//! Converts civil calendar dates into the single time parameter used by every
//! periodic series: Julian years elapsed since 2000-01-01 12:00 dynamical time.
//!
//! ## Pipeline
//! 1. **Julian day**: Gregorian date → day number (Fliegel's formula)
//! 2. **Day progress**: days from the J2000.0 epoch to *local* midnight of the date
//! 3. **Rotation drift**: Earth-rotation lag between universal and dynamical time
//! 4. **Julian years**: `(progress + time-of-day + drift) / 365.25`
//!
//! The observer's UTC offset is always an explicit input; nothing here reads
//! the host time zone.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

/// Length of a Julian year in days.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Seconds in one civil day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fliegel day number of 2000-01-01, i.e. the J2000.0 epoch minus half a day.
const J2000_MIDNIGHT: f64 = 2_451_544.5;

/// Gregorian calendar date → Julian day number.
///
/// Fliegel's formula with January and February counted as months 13 and 14
/// of the previous year:
///
/// ```text
/// JD = ⌊365.25·y⌋ + ⌊y/400⌋ − ⌊y/100⌋ + ⌊30.59·(m − 2)⌋ + d + 1721088
/// ```
///
/// The result is the day number that begins at the *preceding* noon, so
/// 2000-01-01 yields 2451544. No leap-second handling.
pub fn julian_day(year: i32, month: u32, day: u32) -> f64 {
    let (mut y, mut m) = (year as f64, month as f64);
    if month < 3 {
        y -= 1.0;
        m += 12.0;
    }

    (365.25 * y).trunc() + (y / 400.0).trunc() - (y / 100.0).trunc()
        + (30.59 * (m - 2.0)).trunc()
        + day as f64
        + 1_721_088.0
}

/// [`julian_day`] of a [`NaiveDate`].
pub fn julian_day_of(date: NaiveDate) -> f64 {
    julian_day(date.year(), date.month(), date.day())
}

/// Julian day of a date plus its clock time as a fraction of the day.
pub fn julian_day_with_time(datetime: NaiveDateTime) -> f64 {
    julian_day_of(datetime.date()) + day_fraction(datetime.time())
}

/// Days elapsed since the start of the year; 1 January is day 1.
pub fn days_since_new_year(date: NaiveDate) -> f64 {
    let new_years_eve = julian_day(date.year() - 1, 12, 31);
    julian_day_of(date) - new_years_eve
}

/// Earth-rotation drift for a calendar year, in days.
///
/// Linear model of ΔT: 57 s in 1990, growing 0.8 s per year.
pub fn rotation_drift_days(year: i32) -> f64 {
    (57.0 + 0.8 * (year as f64 - 1990.0)) / SECONDS_PER_DAY
}

/// Days from the J2000.0 epoch (2000-01-01 12:00) to local midnight of `date`.
pub fn days_since_j2000(date: NaiveDate, utc_offset_hours: f64) -> f64 {
    julian_day_of(date) - J2000_MIDNIGHT - utc_offset_hours / 24.0
}

/// Elapsed Julian years since 2000.0.
///
/// * `day_progress` - days from J2000.0 to local midnight ([`days_since_j2000`])
/// * `time_fraction` - local time of day as a fraction of a day
/// * `year` - calendar year, selecting the rotation drift
pub fn julian_years_since_2000(day_progress: f64, time_fraction: f64, year: i32) -> f64 {
    (day_progress + time_fraction + rotation_drift_days(year)) / DAYS_PER_JULIAN_YEAR
}

/// Clock time → fraction of a day in `[0, 1)`.
pub fn day_fraction<T: Timelike>(time: T) -> f64 {
    let seconds = time.num_seconds_from_midnight() as f64
        + time.nanosecond().min(999_999_999) as f64 / 1e9;
    seconds / SECONDS_PER_DAY
}

/// Format a fraction of a day as `HH:MM:SS`.
///
/// Hours and minutes are truncated and seconds rounded; a rounded 60th second
/// carries into the minute. Input outside `[0, 1)` is wrapped into the day and
/// the result never exceeds `23:59:59`.
///
/// # Example
/// ```
/// use moon_phase_lib::time::format_clock;
///
/// assert_eq!(format_clock(0.5), "12:00:00");
/// assert_eq!(format_clock(0.999_999_9), "23:59:59");
/// ```
pub fn format_clock(fraction: f64) -> String {
    let hours_total = fraction.rem_euclid(1.0) * 24.0;

    let mut hours = hours_total.trunc() as u32;
    let minutes_total = (hours_total - hours as f64) * 60.0;
    let mut minutes = minutes_total.trunc() as u32;
    let mut seconds = ((minutes_total - minutes as f64) * 60.0).round() as u32;

    if seconds >= 60 {
        seconds = 0;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes = 0;
        hours += 1;
    }
    if hours >= 24 {
        return "23:59:59".to_string();
    }

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// One local calendar day as seen from a fixed UTC offset.
///
/// Caches the day progress and rotation drift so the solver can map any
/// time of day `t` to Julian years without redoing calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalDay {
    date: NaiveDate,
    utc_offset_hours: f64,
    day_progress: f64,
    drift_days: f64,
}

impl LocalDay {
    /// Local day `date` at `utc_offset_hours` east of Greenwich.
    pub fn new(date: NaiveDate, utc_offset_hours: f64) -> Self {
        LocalDay {
            date,
            utc_offset_hours,
            day_progress: days_since_j2000(date, utc_offset_hours),
            drift_days: rotation_drift_days(date.year()),
        }
    }

    /// The local day containing `instant`.
    pub fn of_instant(instant: &DateTime<FixedOffset>) -> Self {
        let offset_hours = instant.offset().local_minus_utc() as f64 / 3600.0;
        Self::new(instant.date_naive(), offset_hours)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn utc_offset_hours(&self) -> f64 {
        self.utc_offset_hours
    }

    /// Days from J2000.0 to local midnight.
    pub fn day_progress(&self) -> f64 {
        self.day_progress
    }

    /// Julian years since 2000.0 at local time of day `t`.
    pub fn julian_years(&self, t: f64) -> f64 {
        (self.day_progress + t + self.drift_days) / DAYS_PER_JULIAN_YEAR
    }
}

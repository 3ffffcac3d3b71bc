//! Moon phase from Sun–Moon elongation.
//!
//! Elongation (Moon longitude minus Sun longitude, 0–360°) is cut into eight
//! 45° buckets: 0 = new, 2 = first quarter, 4 = full, 6 = last quarter.
//! A bucket begins at its nominal phase, so index 4 covers 180°–225°.

use crate::angle::{cos_deg, normalize_angle};
use crate::ephemeris::{moon_longitude, sun_longitude};
use serde::{Deserialize, Serialize};

/// Number of discrete phase buckets.
pub const PHASE_BUCKETS: u8 = 8;

const BUCKET_WIDTH: f64 = 360.0 / PHASE_BUCKETS as f64;

/// Named phase for each bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    /// Name for a bucket index; indices wrap modulo 8.
    pub fn from_index(index: u8) -> Self {
        match index % PHASE_BUCKETS {
            0 => PhaseName::NewMoon,
            1 => PhaseName::WaxingCrescent,
            2 => PhaseName::FirstQuarter,
            3 => PhaseName::WaxingGibbous,
            4 => PhaseName::FullMoon,
            5 => PhaseName::WaningGibbous,
            6 => PhaseName::LastQuarter,
            _ => PhaseName::WaningCrescent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }

    /// Northern-hemisphere moon glyph.
    pub fn glyph(self) -> char {
        match self {
            PhaseName::NewMoon => '🌑',
            PhaseName::WaxingCrescent => '🌒',
            PhaseName::FirstQuarter => '🌓',
            PhaseName::WaxingGibbous => '🌔',
            PhaseName::FullMoon => '🌕',
            PhaseName::WaningGibbous => '🌖',
            PhaseName::LastQuarter => '🌗',
            PhaseName::WaningCrescent => '🌘',
        }
    }
}

/// Phase of the Moon at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    /// Bucket 0–7 (0 = new, 4 = full)
    pub index: u8,
    /// Moon longitude minus Sun longitude, degrees in [0, 360)
    pub elongation: f64,
    /// Illuminated fraction of the disc (0–1)
    pub illuminated_fraction: f64,
}

impl MoonPhase {
    pub fn name(&self) -> PhaseName {
        PhaseName::from_index(self.index)
    }
}

/// Moon minus Sun ecliptic longitude at `jy`, degrees in [0, 360).
pub fn elongation(jy: f64) -> f64 {
    normalize_angle(moon_longitude(jy) - sun_longitude(jy))
}

/// Bucket index for an elongation in degrees.
pub fn phase_index(elongation: f64) -> u8 {
    let bucket = (normalize_angle(elongation) / BUCKET_WIDTH).floor() as u8;
    bucket.min(PHASE_BUCKETS - 1)
}

/// Lit fraction of the disc for an elongation in degrees.
pub fn illuminated_fraction(elongation: f64) -> f64 {
    (1.0 - cos_deg(elongation)) / 2.0
}

/// Phase of the Moon `jy` Julian years after 2000.0.
pub fn moon_phase(jy: f64) -> MoonPhase {
    let elongation = elongation(jy);
    MoonPhase {
        index: phase_index(elongation),
        elongation,
        illuminated_fraction: illuminated_fraction(elongation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::LocalDay;
    use chrono::NaiveDate;

    fn jy_at(y: i32, m: u32, d: u32, ut_hours: f64) -> f64 {
        LocalDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), 0.0).julian_years(ut_hours / 24.0)
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(phase_index(0.0), 0);
        assert_eq!(phase_index(44.999), 0);
        assert_eq!(phase_index(45.0), 1);
        assert_eq!(phase_index(180.0), 4);
        assert_eq!(phase_index(359.999), 7);
        assert_eq!(phase_index(360.0), 0);
        assert_eq!(phase_index(-10.0), 7);
    }

    #[test]
    fn test_illuminated_fraction() {
        assert!(illuminated_fraction(0.0).abs() < 1e-12);
        assert!((illuminated_fraction(90.0) - 0.5).abs() < 1e-12);
        assert!((illuminated_fraction(180.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_names_cycle() {
        assert_eq!(PhaseName::from_index(0), PhaseName::NewMoon);
        assert_eq!(PhaseName::from_index(4), PhaseName::FullMoon);
        assert_eq!(PhaseName::from_index(12), PhaseName::FullMoon);
        assert_eq!(PhaseName::FullMoon.label(), "Full Moon");
        assert_eq!(PhaseName::LastQuarter.glyph(), '🌗');
    }

    #[test]
    fn test_full_moon_january_2024() {
        // 2024-01-25 17:54 UT
        let phase = moon_phase(jy_at(2024, 1, 25, 17.9));
        assert!(phase.index == 3 || phase.index == 4);
        assert!(phase.illuminated_fraction > 0.999);
    }

    #[test]
    fn test_new_moon_january_2024() {
        // 2024-01-11 11:57 UT
        let phase = moon_phase(jy_at(2024, 1, 11, 11.95));
        let gap = phase.elongation.min(360.0 - phase.elongation);
        assert!(gap < 0.3, "elongation {}", phase.elongation);
        assert!(phase.illuminated_fraction < 0.001);
    }

    #[test]
    fn test_waning_gibbous_on_japan_new_year() {
        // 2024-01-01 00:00 JST
        let day = LocalDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 9.0);
        let phase = moon_phase(day.julian_years(0.0));
        assert_eq!(phase.index, 5);
        assert_eq!(phase.name(), PhaseName::WaningGibbous);
    }

    #[test]
    fn test_phase_advances_through_month() {
        let start = jy_at(2024, 1, 12, 0.0);
        let mut previous = moon_phase(start).index;
        let mut steps = 0;
        // four weeks from just after new moon, stopping short of the next one
        for day in 1..29 {
            let index = moon_phase(start + day as f64 / 365.25).index;
            if index != previous {
                assert_eq!(index, (previous + 1) % PHASE_BUCKETS);
                steps += 1;
            }
            previous = index;
        }
        assert_eq!(steps, 7);
    }
}

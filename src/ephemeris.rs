//! # Low-Precision Sun and Moon Ephemeris
//!
//! Periodic-series positions for the Sun and Moon plus the coordinate
//! transforms needed to relate them to an observer's horizon.
//!
//! Accuracy: about 0.01° in solar longitude and a few hundredths of a degree
//! in lunar position for dates within a century or so of 2000. All angles are
//! degrees; `jy` is Julian years since 2000.0 (see [`crate::time`]).
//!
//! ## Coordinate chain
//! 1. **Ecliptic**: longitude/latitude from the series tables
//! 2. **Equatorial**: rotation by the obliquity of the ecliptic
//! 3. **Horizontal**: hour angle from local sidereal time, then azimuth/altitude

use crate::angle::{cos_deg, normalize_angle, round_to, sin_deg, tan_deg, DEG};
use crate::series::evaluate_series;
use crate::tables;
use serde::{Deserialize, Serialize};

/// Mean atmospheric refraction at the horizon, degrees (35′08″).
pub const HORIZON_REFRACTION: f64 = 0.585556;

/// Solar semi-diameter at 1 AU, degrees.
const SUN_RADIUS_AT_1AU: f64 = 0.266994;

/// Solar horizontal parallax at 1 AU, degrees.
const SUN_PARALLAX_AT_1AU: f64 = 0.0024428;

/// Greenwich sidereal time at 0h UT on the J2000.0 date, degrees.
const SIDEREAL_AT_J2000_MIDNIGHT: f64 = 100.4606;

/// Lowest altitude for Radau's refraction formula, degrees.
const RADAU_MIN_ALTITUDE: f64 = 4.0;

/// Below this altitude no refraction is applied, degrees.
const REFRACTION_FLOOR: f64 = -1.0;

/// Decimal places kept in reported azimuth and altitude.
const DIGITS: i32 = 2;

/// Position on the ecliptic, degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EclipticCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

/// Position on the celestial equator, degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    /// Right ascension in [0, 360)
    pub right_ascension: f64,
    pub declination: f64,
}

/// Position relative to the observer's horizon, degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinate {
    /// Azimuth from north through east, in [0, 360)
    pub azimuth: f64,
    /// Apparent altitude including refraction
    pub altitude: f64,
}

/// Apparent ecliptic longitude of the Sun.
pub fn sun_longitude(jy: f64) -> f64 {
    let mut longitude = evaluate_series(tables::SUN_LONGITUDE, jy);
    // equation of the centre
    longitude += (1.9146 - 0.00005 * jy) * sin_deg(normalize_angle(357.538 + 359.991 * jy));
    longitude += normalize_angle(280.4603 + 360.00769 * jy);
    normalize_angle(longitude)
}

/// Earth–Sun distance in astronomical units.
pub fn sun_distance(jy: f64) -> f64 {
    let mut log_distance = evaluate_series(tables::SUN_DISTANCE, jy);
    log_distance +=
        (0.007256 - 0.0000002 * jy) * sin_deg(normalize_angle(267.54 + 359.991 * jy));
    10f64.powf(log_distance)
}

/// Apparent solar semi-diameter at `distance_au`, degrees.
pub fn sun_apparent_radius(distance_au: f64) -> f64 {
    SUN_RADIUS_AT_1AU / distance_au
}

/// Solar horizontal parallax at `distance_au`, degrees.
pub fn sun_parallax(distance_au: f64) -> f64 {
    SUN_PARALLAX_AT_1AU / distance_au
}

/// Ecliptic position of the Sun; its latitude is taken as zero.
pub fn sun_ecliptic(jy: f64) -> EclipticCoordinate {
    EclipticCoordinate {
        longitude: sun_longitude(jy),
        latitude: 0.0,
    }
}

/// Ecliptic longitude of the Moon.
///
/// The anomaly correction series shifts the argument of the 6.29° equation
/// of the centre before that term is added.
pub fn moon_longitude(jy: f64) -> f64 {
    let anomaly_correction = evaluate_series(tables::MOON_ANOMALY_CORRECTION, jy);
    let mut longitude = evaluate_series(tables::MOON_LONGITUDE, jy);
    longitude += 6.2887 * sin_deg(normalize_angle(134.961 + 4771.9886 * jy + anomaly_correction));
    longitude += normalize_angle(218.3161 + 4812.67881 * jy);
    normalize_angle(longitude)
}

/// Ecliptic latitude of the Moon.
pub fn moon_latitude(jy: f64) -> f64 {
    let node_correction = evaluate_series(tables::MOON_NODE_CORRECTION, jy);
    let latitude = evaluate_series(tables::MOON_LATITUDE, jy);
    latitude + 5.1282 * sin_deg(normalize_angle(93.273 + 4832.0202 * jy + node_correction))
}

/// Lunar horizontal parallax, degrees.
pub fn moon_parallax(jy: f64) -> f64 {
    evaluate_series(tables::MOON_PARALLAX, jy)
}

/// Ecliptic position of the Moon.
pub fn moon_ecliptic(jy: f64) -> EclipticCoordinate {
    EclipticCoordinate {
        longitude: moon_longitude(jy),
        latitude: moon_latitude(jy),
    }
}

/// Mean obliquity of the ecliptic, degrees.
pub fn obliquity(jy: f64) -> f64 {
    23.439291 - 0.000130042 * jy
}

/// Rotate ecliptic coordinates onto the equator.
pub fn ecliptic_to_equatorial(ecliptic: EclipticCoordinate, jy: f64) -> EquatorialCoordinate {
    let epsilon = obliquity(jy);
    let (lambda, beta) = (ecliptic.longitude, ecliptic.latitude);

    let x = cos_deg(beta) * cos_deg(lambda);
    let y = -sin_deg(beta) * sin_deg(epsilon) + cos_deg(beta) * sin_deg(lambda) * cos_deg(epsilon);
    let z = sin_deg(beta) * cos_deg(epsilon) + cos_deg(beta) * sin_deg(lambda) * sin_deg(epsilon);

    EquatorialCoordinate {
        right_ascension: normalize_angle(y.atan2(x) / DEG),
        declination: z.clamp(-1.0, 1.0).asin() / DEG,
    }
}

/// Local sidereal time, degrees in [0, 360).
///
/// * `t` - local time of day as a fraction of a day
/// * `longitude` - observer longitude, east positive
/// * `utc_offset_hours` - offset of the local clock from UTC
///
/// At UTC+9 the constant term folds to 325.4606°.
pub fn sidereal_time(jy: f64, t: f64, longitude: f64, utc_offset_hours: f64) -> f64 {
    let universal_fraction = t - utc_offset_hours / 24.0;
    normalize_angle(
        SIDEREAL_AT_J2000_MIDNIGHT
            + 360.007700536 * jy
            + 0.00000003879 * jy * jy
            + 360.0 * universal_fraction
            + longitude,
    )
}

/// Mean refraction for an apparent altitude, degrees.
///
/// Radau's formula for a standard atmosphere (10 °C, 1013.25 hPa) from 4°
/// upward. Between -1° and 4° the low-altitude formula
/// `0.0167 / tan(h + 8.6 / (h + 4.4))` takes over; below -1° there is none.
pub fn refraction(altitude: f64) -> f64 {
    if altitude < REFRACTION_FLOOR {
        return 0.0;
    }
    if altitude < RADAU_MIN_ALTITUDE {
        return 0.0167 / tan_deg(altitude + 8.6 / (altitude + 4.4));
    }
    let tan_z = tan_deg(90.0 - altitude);
    let arcseconds = 58.76 * tan_z - (0.406 * tan_z).powi(2) - (0.0192 * tan_z).powi(3);
    arcseconds / 3600.0
}

/// Azimuth and refracted altitude of an equatorial position.
///
/// Both components are rounded to 0.01°.
pub fn equatorial_to_horizontal(
    equatorial: EquatorialCoordinate,
    sidereal: f64,
    latitude: f64,
) -> HorizontalCoordinate {
    let hour_angle = sidereal - equatorial.right_ascension;
    let delta = equatorial.declination;

    let east = -cos_deg(delta) * sin_deg(hour_angle);
    let north = sin_deg(delta) * cos_deg(latitude)
        - cos_deg(delta) * sin_deg(latitude) * cos_deg(hour_angle);
    let azimuth = normalize_angle(east.atan2(north) / DEG);

    let sin_altitude = sin_deg(delta) * sin_deg(latitude)
        + cos_deg(delta) * cos_deg(latitude) * cos_deg(hour_angle);
    let geometric = sin_altitude.clamp(-1.0, 1.0).asin() / DEG;
    let altitude = geometric + refraction(geometric);

    HorizontalCoordinate {
        azimuth: round_to(azimuth, DIGITS),
        altitude: round_to(altitude, DIGITS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::LocalDay;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn circular_gap(a: f64, b: f64) -> f64 {
        let d = normalize_angle(a - b);
        d.min(360.0 - d)
    }

    /// Julian years at a UT clock time on a date.
    fn jy_at(y: i32, m: u32, d: u32, ut_hours: f64) -> f64 {
        let day = LocalDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), 0.0);
        day.julian_years(ut_hours / 24.0)
    }

    #[test]
    fn test_sun_longitude_at_march_equinox() {
        // 2024-03-20 03:06 UT
        let jy = jy_at(2024, 3, 20, 3.1);
        let lambda = sun_longitude(jy);
        assert!(circular_gap(lambda, 0.0) < 0.02, "λ☉ = {lambda}");
    }

    #[test]
    fn test_sun_longitude_at_june_solstice() {
        // 2024-06-20 20:51 UT
        let jy = jy_at(2024, 6, 20, 20.85);
        let lambda = sun_longitude(jy);
        assert!(circular_gap(lambda, 90.0) < 0.02, "λ☉ = {lambda}");
    }

    #[test]
    fn test_moon_opposite_sun_at_full_moon() {
        // 2024-01-25 17:54 UT
        let jy = jy_at(2024, 1, 25, 17.9);
        let elongation = normalize_angle(moon_longitude(jy) - sun_longitude(jy));
        assert!((elongation - 180.0).abs() < 0.3, "elongation = {elongation}");
    }

    #[test]
    fn test_sun_distance_perihelion_and_aphelion() {
        let perihelion = sun_distance(jy_at(2024, 1, 3, 0.0));
        let aphelion = sun_distance(jy_at(2024, 7, 5, 0.0));
        assert!((perihelion - 0.9833).abs() < 0.0005, "{perihelion}");
        assert!((aphelion - 1.0167).abs() < 0.0005, "{aphelion}");
    }

    #[test]
    fn test_sun_disc_corrections() {
        assert_eq!(sun_apparent_radius(1.0), 0.266994);
        assert_eq!(sun_parallax(2.0), 0.0012214);
    }

    #[test]
    fn test_moon_parallax_and_latitude_ranges() {
        for days in 0..60 {
            let jy = jy_at(2024, 1, 1, 0.0) + days as f64 / 365.25;
            let parallax = moon_parallax(jy);
            assert!((0.89..=1.03).contains(&parallax), "π☾ = {parallax}");
            assert!(moon_latitude(jy).abs() <= 5.35);
        }
    }

    #[test]
    fn test_obliquity() {
        assert_eq!(obliquity(0.0), 23.439291);
        assert!(obliquity(100.0) < obliquity(0.0));
    }

    #[test]
    fn test_ecliptic_to_equatorial_cardinal_points() {
        let jy = 0.0;
        let eps = obliquity(jy);
        let at = |longitude: f64| {
            ecliptic_to_equatorial(
                EclipticCoordinate {
                    longitude,
                    latitude: 0.0,
                },
                jy,
            )
        };

        let vernal = at(0.0);
        assert!(circular_gap(vernal.right_ascension, 0.0) < 1e-9);
        assert!(vernal.declination.abs() < 1e-9);

        let solstice = at(90.0);
        assert!((solstice.right_ascension - 90.0).abs() < 1e-9);
        assert!((solstice.declination - eps).abs() < 1e-9);

        let autumnal = at(180.0);
        assert!((autumnal.right_ascension - 180.0).abs() < 1e-9);

        let winter = at(270.0);
        assert!((winter.right_ascension - 270.0).abs() < 1e-9);
        assert!((winter.declination + eps).abs() < 1e-9);
    }

    #[test]
    fn test_sidereal_time_at_utc_plus_nine() {
        for (jy, t) in [(0.0, 0.0), (24.0, 0.3), (-3.7, 0.99)] {
            let jst_form = normalize_angle(
                325.4606 + 360.007700536 * jy + 0.00000003879 * jy * jy + 360.0 * t + 135.0,
            );
            assert!(circular_gap(sidereal_time(jy, t, 135.0, 9.0), jst_form) < 1e-9);
        }
    }

    #[test]
    fn test_sidereal_time_advances_with_longitude() {
        let a = sidereal_time(24.0, 0.5, 0.0, 0.0);
        let b = sidereal_time(24.0, 0.5, 15.0, 0.0);
        assert!(circular_gap(b - a, 15.0) < 1e-9);
    }

    #[test]
    fn test_refraction() {
        assert_eq!(refraction(-2.0), 0.0);
        assert!((refraction(0.0) - 0.0167 / tan_deg(8.6 / 4.4)).abs() < 1e-12);
        assert!(refraction(90.0).abs() < 1e-12);
        let r = refraction(45.0);
        assert!((r * 3600.0 - (58.76 - 0.406f64.powi(2) - 0.0192f64.powi(3))).abs() < 1e-6);
    }

    #[test]
    fn test_refraction_near_horizon_has_no_large_step() {
        // the two formulas meet at 4° within 0.04° (Radau alone would jump 0.22°)
        let below = refraction(4.0 - 1e-9);
        let above = refraction(4.0);
        assert!((above - below).abs() < 0.04, "{below} vs {above}");

        let mut previous = refraction(-1.0);
        for step in 1..=500 {
            let current = refraction(-1.0 + step as f64 * 0.01);
            assert!((current - previous).abs() < 0.04, "step at {}", -1.0 + step as f64 * 0.01);
            previous = current;
        }
        assert!((0.45..0.7).contains(&refraction(0.0)));
    }

    #[test]
    fn test_horizontal_on_meridian() {
        let equatorial = EquatorialCoordinate {
            right_ascension: 40.0,
            declination: 0.0,
        };
        let horizontal = equatorial_to_horizontal(equatorial, 40.0, 35.0);
        assert_eq!(horizontal.azimuth, 180.0);
        assert_eq!(horizontal.altitude, 55.01);
    }

    #[test]
    fn test_horizontal_setting_in_the_west() {
        let equatorial = EquatorialCoordinate {
            right_ascension: 0.0,
            declination: 0.0,
        };
        let horizontal = equatorial_to_horizontal(equatorial, 90.0, 35.0);
        assert_eq!(horizontal.azimuth, 270.0);
        // on the geometric horizon, lifted by 0.4894° of refraction
        assert_eq!(horizontal.altitude, 0.49);
    }

    /// Right ascension with `atan(y/x)` and a 180° fix when `x < 0`.
    fn quadrant_rule_ra(lambda: f64, beta: f64, eps: f64) -> f64 {
        let x = cos_deg(beta) * cos_deg(lambda);
        let y = -sin_deg(beta) * sin_deg(eps) + cos_deg(beta) * sin_deg(lambda) * cos_deg(eps);
        let mut ra = (y / x).atan() / DEG;
        if x < 0.0 {
            ra += 180.0;
        }
        ra
    }

    /// Azimuth with `atan(e/n)` resolved by the sign of the denominator.
    fn quadrant_rule_azimuth(delta: f64, latitude: f64, hour_angle: f64) -> f64 {
        let east = -cos_deg(delta) * sin_deg(hour_angle);
        let north = sin_deg(delta) * cos_deg(latitude)
            - cos_deg(delta) * sin_deg(latitude) * cos_deg(hour_angle);
        let mut az = (east / north).atan() / DEG;
        if north > 0.0 && az < 0.0 {
            az += 360.0;
        }
        if north < 0.0 {
            az += 180.0;
        }
        az
    }

    proptest! {
        #[test]
        fn prop_atan2_matches_quadrant_rule_ra(lambda in 0.0..360.0f64, beta in -6.0..6.0f64) {
            let eps = obliquity(24.0);
            let ecliptic = EclipticCoordinate { longitude: lambda, latitude: beta };
            let eq = ecliptic_to_equatorial(ecliptic, 24.0);
            let by_quadrant = quadrant_rule_ra(lambda, beta, eps);
            prop_assert!(circular_gap(eq.right_ascension, by_quadrant) < 1e-9);
        }

        #[test]
        fn prop_atan2_matches_quadrant_rule_azimuth(
            delta in -28.0..28.0f64,
            latitude in -66.0..66.0f64,
            hour_angle in 0.0..360.0f64,
        ) {
            let eq = EquatorialCoordinate { right_ascension: 0.0, declination: delta };
            let horizontal = equatorial_to_horizontal(eq, hour_angle, latitude);
            let by_quadrant = round_to(quadrant_rule_azimuth(delta, latitude, hour_angle), DIGITS);
            prop_assert!(circular_gap(horizontal.azimuth, by_quadrant) < 0.011);
        }

        #[test]
        fn prop_equatorial_in_range(
            lambda in -720.0..720.0f64,
            beta in -90.0..90.0f64,
            jy in -50.0..50.0f64,
        ) {
            let ecliptic = EclipticCoordinate { longitude: lambda, latitude: beta };
            let eq = ecliptic_to_equatorial(ecliptic, jy);
            prop_assert!((0.0..360.0).contains(&eq.right_ascension));
            prop_assert!((-90.0..=90.0).contains(&eq.declination));
        }
    }
}

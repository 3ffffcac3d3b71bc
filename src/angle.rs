//! # Angle Helpers
//!
//! Every quantity in the almanac is carried in degrees; radians only appear
//! at the moment a trigonometric function is evaluated. These helpers keep
//! that conversion in one place.

use core::f64::consts::PI;

/// Degrees → radians factor.
pub const DEG: f64 = PI / 180.0;

/// Normalize an angle into `[0, 360)`.
///
/// Uses the floor form `a - 360·floor(a / 360)`, so negative input lands in
/// the same range as positive input.
///
/// # Example
/// ```
/// use moon_phase_lib::angle::normalize_angle;
///
/// assert_eq!(normalize_angle(370.0), 10.0);
/// assert_eq!(normalize_angle(-90.0), 270.0);
/// ```
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle - 360.0 * (angle / 360.0).floor();
    // -1e-20 wraps to exactly 360.0 in floating point
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize an angle into `[0, 360)` by reflecting negative input.
///
/// Negative angles are folded as `360 - (|a| mod 360)`; non-negative angles
/// use truncating division. Produces the same value as [`normalize_angle`]
/// for every real input, including exact negative multiples of 360.
pub fn normalize_angle_reflect(angle: f64) -> f64 {
    let wrapped = if angle < 0.0 {
        let magnitude = -angle;
        let remainder = magnitude - 360.0 * (magnitude / 360.0).trunc();
        if remainder == 0.0 {
            0.0
        } else {
            360.0 - remainder
        }
    } else {
        angle - 360.0 * (angle / 360.0).trunc()
    };

    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle into `[-180, 180)`.
pub fn wrap_signed(angle: f64) -> f64 {
    normalize_angle(angle + 180.0) - 180.0
}

/// Sine of an angle given in degrees.
#[inline]
pub fn sin_deg(angle: f64) -> f64 {
    (angle * DEG).sin()
}

/// Cosine of an angle given in degrees.
#[inline]
pub fn cos_deg(angle: f64) -> f64 {
    (angle * DEG).cos()
}

/// Tangent of an angle given in degrees.
#[inline]
pub fn tan_deg(angle: f64) -> f64 {
    (angle * DEG).tan()
}

/// Round to `digits` decimal places.
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

//! Observer location on the Earth's surface.

use crate::error::AlmanacError;
use serde::{Deserialize, Serialize};

/// Horizon dip per square root of a metre of elevation, degrees.
const DIP_PER_SQRT_METRE: f64 = 0.0353333;

/// A validated observing site.
///
/// Latitude is positive north, longitude positive east, both in degrees.
/// Elevation below sea level is accepted and simply contributes no horizon dip.
///
/// # Example
/// ```
/// use moon_phase_lib::Observer;
///
/// let akashi = Observer::new(35.0, 135.0, 0.0).unwrap();
/// assert_eq!(akashi.latitude(), 35.0);
/// assert!(Observer::new(91.0, 0.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObserver", into = "RawObserver")]
pub struct Observer {
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
}

impl Observer {
    /// Validate and build an observer.
    ///
    /// # Errors
    /// [`AlmanacError::InvalidObserver`] when latitude is outside [-90, 90],
    /// longitude outside [-180, 180], or any value is not finite.
    pub fn new(latitude: f64, longitude: f64, elevation_m: f64) -> Result<Self, AlmanacError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AlmanacError::InvalidObserver {
                field: "latitude",
                value: latitude,
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AlmanacError::InvalidObserver {
                field: "longitude",
                value: longitude,
            });
        }
        if !elevation_m.is_finite() {
            return Err(AlmanacError::InvalidObserver {
                field: "elevation_m",
                value: elevation_m,
            });
        }

        Ok(Observer {
            latitude,
            longitude,
            elevation_m,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }

    /// Depression of the visible horizon caused by the observer's height, degrees.
    pub fn horizon_dip(&self) -> f64 {
        DIP_PER_SQRT_METRE * self.elevation_m.max(0.0).sqrt()
    }
}

/// Unvalidated serde shape of [`Observer`].
#[derive(Serialize, Deserialize)]
struct RawObserver {
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
}

impl TryFrom<RawObserver> for Observer {
    type Error = AlmanacError;

    fn try_from(raw: RawObserver) -> Result<Self, Self::Error> {
        Observer::new(raw.latitude, raw.longitude, raw.elevation_m)
    }
}

impl From<Observer> for RawObserver {
    fn from(observer: Observer) -> Self {
        RawObserver {
            latitude: observer.latitude,
            longitude: observer.longitude,
            elevation_m: observer.elevation_m,
        }
    }
}

//! Coordinate parsing and great-circle distance.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees, stored on profiles as `"lon,lat"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl FromStr for Coordinates {
    type Err = Error;

    /// Parses the stored `"lon,lat"` form. Anything that does not split into
    /// exactly two floats is a non-retryable data error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCoordinates { raw: s.to_string() };
        let mut parts = s.split(',');
        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        Ok(Coordinates {
            longitude: lon.parse().map_err(|_| invalid())?,
            latitude: lat.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.longitude, self.latitude)
    }
}

/// Haversine distance in km between two points.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(b.latitude - a.latitude);
    let dlon = to_rad(b.longitude - a.longitude);
    let h = (dlat / 2.0).sin().powi(2)
        + to_rad(a.latitude).cos() * to_rad(b.latitude).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_KM * c
}

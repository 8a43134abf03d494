//! Sidereal time and ECI to geodetic conversion.
//!
//! GMST comes from the J2000 polynomial; the geodetic inversion is the
//! standard iterative ellipsoid solution over the sgp4 WGS84 constants.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::propagator::{EciPosition, SECONDS_PER_DAY};

pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
pub const GMST_BASE_DEG: f64 = 280.46061837;
pub const GMST_ROTATION_PER_DAY: f64 = 360.98564736629;
pub const GMST_CORRECTION: f64 = 0.000387933;

/// WGS84 flattening of the reference ellipsoid.
pub const FLATTENING: f64 = 1.0 / 298.26;

/// Geodetic coordinates on the WGS84 ellipsoid. Altitude is meters; the
/// conversion below works in kilometers and scales at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// Greenwich Mean Sidereal Time in radians for the given instant.
pub fn greenwich_mean_sidereal_time(at: DateTime<Utc>) -> f64 {
    let j2000 = DateTime::parse_from_rfc3339("2000-01-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let days_since_j2000 = (at - j2000).num_milliseconds() as f64 / (1000.0 * SECONDS_PER_DAY);
    let centuries = days_since_j2000 / DAYS_PER_JULIAN_CENTURY;
    let gmst_degrees = GMST_BASE_DEG
        + GMST_ROTATION_PER_DAY * days_since_j2000
        + GMST_CORRECTION * centuries * centuries
        - centuries * centuries * centuries / 38710000.0;
    gmst_degrees.rem_euclid(360.0).to_radians()
}

fn wrap_longitude(rad: f64) -> f64 {
    (rad + PI).rem_euclid(2.0 * PI) - PI
}

/// Converts an ECI position to geodetic coordinates at the given instant.
///
/// Longitude follows from the Earth rotation angle (GMST); latitude converges
/// through the usual fixed-point iteration on the ellipsoid normal. Accurate
/// to well under 0.01 degrees for the MEO regime the GNSS constellations fly.
pub fn eci_to_geodetic(eci: &EciPosition, at: DateTime<Utc>) -> GeodeticPosition {
    let gmst = greenwich_mean_sidereal_time(at);
    let [x, y, z] = eci.position;
    let ae = sgp4::WGS84.ae;
    let e2 = FLATTENING * (2.0 - FLATTENING);

    let lon = wrap_longitude(y.atan2(x) - gmst);
    let r = (x * x + y * y).sqrt();
    let mut lat = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..10 {
        let previous = lat;
        c = 1.0 / (1.0 - e2 * previous.sin() * previous.sin()).sqrt();
        lat = (z + ae * c * e2 * previous.sin()).atan2(r);
        if (lat - previous).abs() < 1e-10 {
            break;
        }
    }
    let altitude_km = r / lat.cos() - ae * c;

    GeodeticPosition {
        latitude_deg: lat.to_degrees(),
        longitude_deg: lon.to_degrees(),
        altitude_m: altitude_km * 1000.0,
    }
}

//! Observer-relative visibility geometry.

use serde::Serialize;

use crate::geodetic::GeodeticPosition;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VisibilityResult {
    /// Degrees above the observer's horizon; negative means below.
    pub elevation_deg: f64,
    /// Compass bearing to the satellite, degrees in [0, 360).
    pub azimuth_deg: f64,
    /// Great-circle surface distance to the sub-satellite point, km.
    pub distance_km: f64,
    pub visible: bool,
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Computes elevation, azimuth, surface distance and the visibility flag for
/// a satellite as seen from an observer at sea level.
///
/// Elevation uses the flat-horizon approximation asin(h / sqrt(d² + h²)) over
/// the haversine surface distance. That is kept for output compatibility with
/// the feeds this engine replaces; it is adequate at MEO altitudes and is not
/// a full ECEF line-of-sight solution. When observer and sub-satellite point
/// coincide the azimuth resolves to 0 through the atan2(0, 0) convention.
pub fn compute_visibility(
    observer_lat_deg: f64,
    observer_lon_deg: f64,
    satellite: &GeodeticPosition,
) -> VisibilityResult {
    let lat1 = observer_lat_deg.to_radians();
    let lon1 = observer_lon_deg.to_radians();
    let lat2 = satellite.latitude_deg.to_radians();
    let lon2 = satellite.longitude_deg.to_radians();

    let distance_km = haversine_km(lat1, lon1, lat2, lon2);

    let height_km = satellite.altitude_m / 1000.0;
    let elevation_deg = (height_km / (distance_km * distance_km + height_km * height_km).sqrt())
        .asin()
        .to_degrees();

    let dlon = lon2 - lon1;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    // rem_euclid of a tiny negative angle rounds up to exactly 360.0; fold
    // the boundary back so the bearing stays in [0, 360).
    let azimuth_deg = match y.atan2(x).to_degrees().rem_euclid(360.0) {
        az if az >= 360.0 => 0.0,
        az => az,
    };

    VisibilityResult {
        elevation_deg,
        azimuth_deg,
        distance_km,
        visible: elevation_deg > 0.0,
    }
}

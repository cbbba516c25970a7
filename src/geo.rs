//! Geographic positions and distances.

/// Radius of the WGS 84 ellipsoid at the geometric centre of Poland, in metres.
pub const EARTH_RADIUS_M: f64 = 6_364_858.7;

/// A WGS 84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Distance to another position in metres
    pub fn distance_to(&self, other: &Position) -> f64 {
        distance(*self, *other)
    }
}

/// Great-circle distance between two positions in metres (haversine formula).
///
/// Any NaN coordinate yields NaN; callers comparing against a threshold must
/// treat that as "too far".
pub fn distance(a: Position, b: Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat_half = (lat2 - lat1) * 0.5;
    let delta_lon_half = (b.lon.to_radians() - a.lon.to_radians()) * 0.5;

    let sqrt_h = (delta_lat_half.sin().powi(2)
        + lat1.cos() * lat2.cos() * delta_lon_half.sin().powi(2))
    .sqrt();

    sqrt_h.asin() * 2.0 * EARTH_RADIUS_M
}

/// True if `a` and `b` are no more than `max_m` metres apart. NaN is never within.
pub fn within(a: Position, b: Position, max_m: f64) -> bool {
    distance(a, b) <= max_m
}

/// Human readable distance. NaN means it could not be computed.
pub fn describe_distance(meters: f64) -> String {
    if meters.is_nan() {
        "an unknown distance".to_string()
    } else {
        format!("{:.2} m", meters)
    }
}

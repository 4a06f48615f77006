//! Great-circle helpers on the spherical-earth approximation.
//!
//! Degrees at the interface, radians inside. Only consumed for map
//! rendering and drag interpretation, so rendering precision is enough.

use crate::core::azimuth::Bearing;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    derive_more::Constructor,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Initial bearing towards `other`.
    ///
    /// Undefined (NaN) for coincident points; callers guard.
    #[must_use]
    pub fn bearing_to(self, other: Self) -> Bearing {
        let d_lon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        Bearing(y.atan2(x).to_degrees()).normalized()
    }

    /// Point reached by travelling `distance_meters` along `bearing`.
    #[must_use]
    pub fn destination(self, bearing: Bearing, distance_meters: f64) -> Self {
        let bearing = bearing.0.to_radians();
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        let angular_distance = distance_meters / EARTH_RADIUS_METERS;
        let dest_lat = (lat.sin() * angular_distance.cos()
            + lat.cos() * angular_distance.sin() * bearing.cos())
        .asin();
        let dest_lon = lon
            + (bearing.sin() * angular_distance.sin() * lat.cos())
                .atan2(angular_distance.cos() - lat.sin() * dest_lat.sin());
        Self::new(dest_lat.to_degrees(), dest_lon.to_degrees())
    }
}

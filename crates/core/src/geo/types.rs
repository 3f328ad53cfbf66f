//! Geographic primitives.

use serde::{Deserialize, Serialize};

/// A coordinate pair in (longitude, latitude) order, WGS84 degrees.
///
/// The wire models carry flat `latitude`/`longitude` fields; renderers
/// consume (lng, lat). The swap happens wherever a coordinate crosses the
/// render boundary, and this type marks that it already has.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Create a coordinate pair from longitude and latitude.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lng, self.lat)
    }
}

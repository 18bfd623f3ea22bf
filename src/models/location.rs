use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::utils::coordinates::normalize_longitude;

/// Normalized grid point coordinate used as the forecast map key.
///
/// Equality is exact: two keys match only when both coordinates are the same
/// `f64` value. Grids repeat coordinates bit-for-bit across quantities and
/// valid-times, so no tolerance is applied. Matching nearby points would need
/// a quantization step before the key is built.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocationKey {
    lat: f64,
    lon: f64,
}

impl LocationKey {
    /// Build a key, mapping longitudes above 180 into (-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat: canonical_zero(latitude),
            lon: canonical_zero(normalize_longitude(longitude)),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Total order by latitude, then longitude
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.lat
            .total_cmp(&other.lat)
            .then_with(|| self.lon.total_cmp(&other.lon))
    }
}

// -0.0 == 0.0 but their bits differ; fold them so Hash agrees with Eq.
fn canonical_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl PartialEq for LocationKey {
    fn eq(&self, other: &Self) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lon.to_bits() == other.lon.to_bits()
    }
}

impl Eq for LocationKey {}

impl Hash for LocationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat.to_bits().hash(state);
        self.lon.to_bits().hash(state);
    }
}

impl PartialOrd for LocationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{FULL_TURN_DEGREES, LONGITUDE_MAX};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Map a longitude from the 0..360 grid convention into (-180, 180]
///
/// # Examples
/// ```
/// use grid_forecast::utils::normalize_longitude;
///
/// assert_eq!(normalize_longitude(200.0), -160.0);
/// assert_eq!(normalize_longitude(180.0), 180.0);
/// assert_eq!(normalize_longitude(24.2), 24.2);
/// ```
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > LONGITUDE_MAX {
        longitude - FULL_TURN_DEGREES
    } else {
        longitude
    }
}

/// Geographic bounding box in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct BoundingBox {
    #[validate(range(min = -180.0, max = 180.0))]
    pub min_lon: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub min_lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub max_lon: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let bbox = Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        };
        bbox.validate()?;

        if min_lon > max_lon || min_lat > max_lat {
            return Err(ProcessingError::InvalidCoordinate(format!(
                "Bounding box corners are inverted: {},{},{},{}",
                min_lon, min_lat, max_lon, max_lat
            )));
        }

        Ok(bbox)
    }

    /// Parse `minLon,minLat,maxLon,maxLat`
    pub fn parse(bbox: &str) -> Result<Self> {
        let parts: Vec<&str> = bbox.split(',').map(|s| s.trim()).collect();

        if parts.len() != 4 {
            return Err(ProcessingError::InvalidCoordinate(format!(
                "Invalid bbox: '{}'. Expected format: 'minLon,minLat,maxLon,maxLat'",
                bbox
            )));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse::<f64>().map_err(|_| {
                ProcessingError::InvalidCoordinate(format!("Invalid bbox value: '{}'", part))
            })?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Inclusive containment; `longitude` must already be normalized
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

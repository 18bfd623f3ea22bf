use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::LocationKey;

/// One decoded scalar value for a quantity, grid point and valid-time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    #[serde(rename = "quantity", alias = "quantity_id")]
    pub quantity_id: String,
    pub valid_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f32,
}

impl GridRecord {
    pub fn new(
        quantity_id: impl Into<String>,
        valid_time: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        value: f32,
    ) -> Self {
        Self {
            quantity_id: quantity_id.into(),
            valid_time,
            latitude,
            longitude,
            value,
        }
    }

    pub fn location_key(&self) -> LocationKey {
        LocationKey::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_location_key() {
        let ts = Utc.with_ymd_and_hms(2022, 8, 17, 12, 0, 0).unwrap();
        let record = GridRecord::new("TMP", ts, 60.1, 200.0, 283.0);
        assert_eq!(record.location_key(), LocationKey::new(60.1, -160.0));
        // The record itself keeps the raw longitude
        assert_eq!(record.longitude, 200.0);
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{"quantity_id":"WIND","valid_time":"2022-08-17T12:00:00Z","latitude":60.1,"longitude":24.2,"value":5.0}"#;
        let record: GridRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity_id, "WIND");
        assert_eq!(
            record.valid_time,
            Utc.with_ymd_and_hms(2022, 8, 17, 12, 0, 0).unwrap()
        );
    }
}

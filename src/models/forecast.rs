use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;

use crate::models::LocationKey;

/// Forecast values for one grid point at one valid-time.
///
/// Fields that no record supplied stay at zero, so a missing reading and a
/// measured zero look the same downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub temperature: f32,    // °C
    pub wind_speed: f32,     // m/s
    pub wind_direction: i32, // degrees
    pub precipitation: f32,
}

pub type TimeSeries = HashMap<DateTime<Utc>, ForecastItem>;

/// Location -> valid-time -> item. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    locations: HashMap<LocationKey, TimeSeries>,
}

impl Forecast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item for `(key, valid_time)`, created zeroed if absent
    pub fn slot_mut(&mut self, key: LocationKey, valid_time: DateTime<Utc>) -> &mut ForecastItem {
        self.locations
            .entry(key)
            .or_default()
            .entry(valid_time)
            .or_default()
    }

    pub fn insert(&mut self, key: LocationKey, valid_time: DateTime<Utc>, item: ForecastItem) {
        self.locations
            .entry(key)
            .or_default()
            .insert(valid_time, item);
    }

    pub fn item(&self, key: &LocationKey, valid_time: &DateTime<Utc>) -> Option<&ForecastItem> {
        self.locations.get(key).and_then(|series| series.get(valid_time))
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Total number of (location, valid-time) items
    pub fn item_count(&self) -> usize {
        self.locations.values().map(|series| series.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, LocationKey, TimeSeries> {
        self.locations.iter()
    }

    /// Absorb another forecast built from a disjoint set of locations.
    ///
    /// Shared slots, if any, take `other`'s item.
    pub fn merge(&mut self, other: Forecast) {
        for (key, series) in other.locations {
            match self.locations.entry(key) {
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(series);
                }
                hash_map::Entry::Occupied(mut entry) => {
                    entry.get_mut().extend(series);
                }
            }
        }
    }

    /// Earliest and latest valid-time across all locations
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self.locations.values().flat_map(|series| series.keys());
        let first = *times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(*t), hi.max(*t))))
    }
}

impl<'a> IntoIterator for &'a Forecast {
    type Item = (&'a LocationKey, &'a TimeSeries);
    type IntoIter = hash_map::Iter<'a, LocationKey, TimeSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::ForecastItem;
use crate::utils::constants::{
    KELVIN_OFFSET, QUANTITY_PRECIPITATION, QUANTITY_TEMPERATURE, QUANTITY_WIND_DIRECTION,
    QUANTITY_WIND_SPEED,
};

/// Physical quantities carried into a forecast item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Temperature,   // Kelvin in, Celsius out
    WindSpeed,     // m/s
    WindDirection, // degrees
    Precipitation, // mm or mm/h
}

impl Quantity {
    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Temperature => "temperature",
            Quantity::WindSpeed => "wind_speed",
            Quantity::WindDirection => "wind_direction",
            Quantity::Precipitation => "precipitation",
        }
    }

    /// Convert `value` to output units and store it in the one field this quantity owns
    pub fn apply(&self, item: &mut ForecastItem, value: f32) {
        match self {
            Quantity::Temperature => item.temperature = value - KELVIN_OFFSET,
            // `as` truncates toward zero and saturates out-of-range values
            Quantity::WindDirection => item.wind_direction = value as i32,
            Quantity::WindSpeed => item.wind_speed = value,
            Quantity::Precipitation => item.precipitation = value,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lookup from provider quantity identifiers to quantities
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityTable {
    aliases: HashMap<String, Quantity>,
}

impl QuantityTable {
    /// A table that recognizes nothing
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    pub fn with_alias(mut self, identifier: impl Into<String>, quantity: Quantity) -> Self {
        self.insert(identifier, quantity);
        self
    }

    /// Register an identifier; a later registration of the same identifier replaces the earlier one
    pub fn insert(&mut self, identifier: impl Into<String>, quantity: Quantity) {
        self.aliases.insert(identifier.into(), quantity);
    }

    pub fn resolve(&self, identifier: &str) -> Option<Quantity> {
        self.aliases.get(identifier).copied()
    }

    pub fn identifiers_for(&self, quantity: Quantity) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, q)| **q == quantity)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for QuantityTable {
    fn default() -> Self {
        Self::empty()
            .with_alias(QUANTITY_TEMPERATURE, Quantity::Temperature)
            .with_alias(QUANTITY_WIND_DIRECTION, Quantity::WindDirection)
            .with_alias(QUANTITY_WIND_SPEED, Quantity::WindSpeed)
            .with_alias(QUANTITY_PRECIPITATION, Quantity::Precipitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = QuantityTable::default();
        assert_eq!(table.resolve("TMP"), Some(Quantity::Temperature));
        assert_eq!(table.resolve("WIND"), Some(Quantity::WindSpeed));
        assert_eq!(table.resolve("var192_140_242"), Some(Quantity::WindDirection));
        assert_eq!(table.resolve("var192_201_113"), Some(Quantity::Precipitation));
        assert_eq!(table.resolve("UNKNOWN_X"), None);
        assert_eq!(table.resolve("tmp"), None); // Identifiers are case sensitive
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_temperature_conversion() {
        let mut item = ForecastItem::default();
        Quantity::Temperature.apply(&mut item, 293.94998);
        assert_eq!(item.temperature, 20.799988);
    }

    #[test]
    fn test_wind_direction_truncates() {
        let mut item = ForecastItem::default();
        Quantity::WindDirection.apply(&mut item, 207.9);
        assert_eq!(item.wind_direction, 207);

        Quantity::WindDirection.apply(&mut item, -3.7);
        assert_eq!(item.wind_direction, -3);
    }

    #[test]
    fn test_apply_touches_one_field() {
        let base = ForecastItem {
            temperature: 1.0,
            wind_speed: 2.0,
            wind_direction: 3,
            precipitation: 4.0,
        };

        let mut item = base;
        Quantity::WindSpeed.apply(&mut item, 7.5);
        assert_eq!(item.wind_speed, 7.5);
        assert_eq!(item.temperature, base.temperature);
        assert_eq!(item.wind_direction, base.wind_direction);
        assert_eq!(item.precipitation, base.precipitation);

        let mut item = base;
        Quantity::Precipitation.apply(&mut item, 0.1);
        assert_eq!(item.precipitation, 0.1);
        assert_eq!(item.wind_speed, base.wind_speed);
        assert_eq!(item.temperature, base.temperature);
        assert_eq!(item.wind_direction, base.wind_direction);
    }

    #[test]
    fn test_extra_aliases() {
        let table = QuantityTable::default().with_alias("WindSpeedMS", Quantity::WindSpeed);
        assert_eq!(table.resolve("WindSpeedMS"), Some(Quantity::WindSpeed));
        assert_eq!(table.identifiers_for(Quantity::WindSpeed), vec!["WIND", "WindSpeedMS"]);
    }
}

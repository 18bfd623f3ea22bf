use crate::error::Result;
use crate::models::{Quantity, QuantityTable};
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_PARALLEL_THRESHOLD, ENV_PREFIX, QUANTITY_PRECIPITATION,
    QUANTITY_TEMPERATURE, QUANTITY_WIND_DIRECTION, QUANTITY_WIND_SPEED,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Identifier lists per quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuantitySettings {
    pub temperature: Vec<String>,
    pub wind_speed: Vec<String>,
    pub wind_direction: Vec<String>,
    pub precipitation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AggregationSettings {
    #[validate(range(min = 1, max = 1024))]
    pub workers: usize,

    pub parallel_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OutputSettings {
    pub sorted: bool,
    pub pretty: bool,
}

/// Layered configuration: defaults, then a TOML file, then `GRID_FORECAST_*` variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub quantities: QuantitySettings,

    #[validate(nested)]
    pub aggregation: AggregationSettings,

    #[validate(nested)]
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quantities: QuantitySettings {
                temperature: vec![QUANTITY_TEMPERATURE.to_string()],
                wind_speed: vec![QUANTITY_WIND_SPEED.to_string()],
                wind_direction: vec![QUANTITY_WIND_DIRECTION.to_string()],
                precipitation: vec![QUANTITY_PRECIPITATION.to_string()],
            },
            aggregation: AggregationSettings {
                workers: num_cpus::get(),
                parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            },
            output: OutputSettings {
                sorted: true,
                pretty: false,
            },
        }
    }
}

impl Settings {
    /// Load from `path` (required when given) or an optional `grid-forecast.toml`, plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, Self::environment())
    }

    /// `GRID_FORECAST_*` variables; quantity lists are comma separated
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("quantities.temperature")
            .with_list_parse_key("quantities.wind_speed")
            .with_list_parse_key("quantities.wind_direction")
            .with_list_parse_key("quantities.precipitation")
    }

    pub fn from_sources(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("quantities.temperature", defaults.quantities.temperature)?
            .set_default("quantities.wind_speed", defaults.quantities.wind_speed)?
            .set_default("quantities.wind_direction", defaults.quantities.wind_direction)?
            .set_default("quantities.precipitation", defaults.quantities.precipitation)?
            .set_default("aggregation.workers", defaults.aggregation.workers as i64)?
            .set_default(
                "aggregation.parallel_threshold",
                defaults.aggregation.parallel_threshold as i64,
            )?
            .set_default("output.sorted", defaults.output.sorted)?
            .set_default("output.pretty", defaults.output.pretty)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder.add_source(environment).build()?.try_deserialize()?;
        settings.validate()?;

        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Apply command-line overrides and re-validate the result
    pub fn apply_overrides(
        &mut self,
        workers: Option<usize>,
        sorted: Option<bool>,
        pretty: bool,
    ) -> Result<()> {
        if let Some(workers) = workers {
            self.aggregation.workers = workers;
        }
        if let Some(sorted) = sorted {
            self.output.sorted = sorted;
        }
        self.output.pretty |= pretty;

        self.validate()?;
        Ok(())
    }

    /// Identifier table; `TMP` always resolves to temperature
    pub fn quantity_table(&self) -> QuantityTable {
        let mut table = QuantityTable::empty();
        let groups = [
            (Quantity::Temperature, &self.quantities.temperature),
            (Quantity::WindSpeed, &self.quantities.wind_speed),
            (Quantity::WindDirection, &self.quantities.wind_direction),
            (Quantity::Precipitation, &self.quantities.precipitation),
        ];

        for (quantity, identifiers) in groups {
            for identifier in identifiers {
                table.insert(identifier.as_str(), quantity);
            }
        }

        table.insert(QUANTITY_TEMPERATURE, Quantity::Temperature);
        table
    }
}

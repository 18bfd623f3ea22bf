/// Provider quantity identifiers
pub const QUANTITY_TEMPERATURE: &str = "TMP";
pub const QUANTITY_WIND_SPEED: &str = "WIND";
pub const QUANTITY_WIND_DIRECTION: &str = "var192_140_242";
pub const QUANTITY_PRECIPITATION: &str = "var192_201_113";

/// Unit conversion
pub const KELVIN_OFFSET: f32 = 273.15;

/// Longitude wraparound
pub const LONGITUDE_MAX: f64 = 180.0;
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// Timestamp layout accepted for filter bounds
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Processing defaults
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 50_000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "grid-forecast.toml";
pub const ENV_PREFIX: &str = "GRID_FORECAST";

/// Input format names
pub const FORMAT_CSV: &str = "csv";
pub const FORMAT_JSON_LINES: &str = "jsonl";

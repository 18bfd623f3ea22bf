//! Aggregates decoded meteorological grid records into per-location forecast
//! time series and encodes them as a fixed JSON document.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use grid_forecast::models::GridRecord;
//! use grid_forecast::processors::ForecastAggregator;
//! use grid_forecast::writers::JsonWriter;
//!
//! let t1 = Utc.with_ymd_and_hms(2022, 8, 17, 12, 0, 0).unwrap();
//! let records = vec![
//!     GridRecord::new("TMP", t1, 60.1, 24.2, 283.0),
//!     GridRecord::new("WIND", t1, 60.1, 24.2, 5.0),
//! ];
//!
//! let forecast = ForecastAggregator::new().aggregate(&records);
//! let json = JsonWriter::new().encode(&forecast).unwrap();
//! assert_eq!(
//!     String::from_utf8(json).unwrap(),
//!     r#"{"locations":[{"lat":60.1,"lon":24.2,"forecasts":[{"ts":"2022-08-17T12:00:00Z","t":9.9,"ws":5.0,"wd":0,"p":0.0}]}]}"#
//! );
//! ```

pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};

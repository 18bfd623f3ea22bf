use crate::error::Result;
use crate::models::{Forecast, ForecastItem, LocationKey, TimeSeries};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

#[derive(Serialize)]
struct ForecastDocument {
    locations: Vec<LocationEntry>,
}

#[derive(Serialize)]
struct LocationEntry {
    lat: f64,
    lon: f64,
    forecasts: Vec<ForecastEntry>,
}

#[derive(Serialize)]
struct ForecastEntry {
    #[serde(serialize_with = "serialize_timestamp")]
    ts: DateTime<Utc>,
    #[serde(serialize_with = "serialize_one_decimal")]
    t: f32,
    #[serde(serialize_with = "serialize_one_decimal")]
    ws: f32,
    wd: i32,
    #[serde(serialize_with = "serialize_one_decimal")]
    p: f32,
}

impl ForecastEntry {
    fn new(ts: DateTime<Utc>, item: &ForecastItem) -> Self {
        Self {
            ts,
            t: item.temperature,
            ws: item.wind_speed,
            wd: item.wind_direction,
            p: item.precipitation,
        }
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn serialize_one_decimal<S: Serializer>(value: &f32, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_one_decimal(*value))
}

/// Round to one decimal place, ties to even.
///
/// Scaling an `f32` by ten is exact in `f64`, so ties are detected exactly.
pub fn round_one_decimal(value: f32) -> f64 {
    let scaled = value as f64 * 10.0;
    let mut rounded = scaled.round();
    if (scaled - scaled.trunc()).abs() == 0.5 {
        rounded = 2.0 * (scaled / 2.0).round();
    }
    rounded / 10.0
}

/// Serializes a [`Forecast`] into the `locations`/`forecasts` document.
///
/// Without sorting, location and forecast order follow map iteration and may
/// differ between runs.
pub struct JsonWriter {
    sorted: bool,
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            sorted: false,
            pretty: false,
        }
    }

    /// Order locations by (lat, lon) and forecasts by timestamp
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn encode(&self, forecast: &Forecast) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(forecast, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_to<W: Write>(&self, forecast: &Forecast, writer: W) -> Result<()> {
        let document = self.build_document(forecast);

        if self.pretty {
            serde_json::to_writer_pretty(writer, &document)?;
        } else {
            serde_json::to_writer(writer, &document)?;
        }

        Ok(())
    }

    /// Write the document to `path`, returning the number of bytes written
    pub fn write_file(&self, forecast: &Forecast, path: &Path) -> Result<usize> {
        let bytes = self.encode(forecast)?;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote forecast document");
        Ok(bytes.len())
    }

    fn build_document(&self, forecast: &Forecast) -> ForecastDocument {
        let mut locations: Vec<(&LocationKey, &TimeSeries)> = forecast.iter().collect();
        if self.sorted {
            locations.sort_by(|a, b| a.0.cmp(b.0));
        }

        let locations = locations
            .into_iter()
            .map(|(key, series)| LocationEntry {
                lat: key.lat(),
                lon: key.lon(),
                forecasts: self.build_entries(series),
            })
            .collect();

        ForecastDocument { locations }
    }

    fn build_entries(&self, series: &TimeSeries) -> Vec<ForecastEntry> {
        let mut entries: Vec<ForecastEntry> = series
            .iter()
            .map(|(ts, item)| ForecastEntry::new(*ts, item))
            .collect();

        if self.sorted {
            entries.sort_by_key(|entry| entry.ts);
        }

        entries
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn two_location_forecast() -> Forecast {
        let mut forecast = Forecast::new();
        let k1 = LocationKey::new(59.920322999999996, 24.168623999999998);
        let k2 = LocationKey::new(60.1, 24.2);

        forecast.insert(
            k1,
            Utc.with_ymd_and_hms(2022, 8, 17, 13, 0, 0).unwrap(),
            ForecastItem { temperature: 5.0, wind_speed: 6.0, wind_direction: 7, precipitation: 8.0 },
        );
        forecast.insert(
            k1,
            Utc.with_ymd_and_hms(2022, 8, 17, 12, 0, 0).unwrap(),
            ForecastItem { temperature: 1.0, wind_speed: 2.0, wind_direction: 3, precipitation: 4.0 },
        );
        forecast.insert(
            k2,
            Utc.with_ymd_and_hms(2022, 8, 18, 12, 0, 0).unwrap(),
            ForecastItem { temperature: 9.0, wind_speed: 10.0, wind_direction: 11, precipitation: 12.0 },
        );
        forecast
    }

    #[test]
    fn test_sorted_document() {
        let output = JsonWriter::new()
            .with_sorted(true)
            .encode(&two_location_forecast())
            .unwrap();

        let expected = concat!(
            r#"{"locations":["#,
            r#"{"lat":59.920322999999996,"lon":24.168623999999998,"forecasts":["#,
            r#"{"ts":"2022-08-17T12:00:00Z","t":1.0,"ws":2.0,"wd":3,"p":4.0},"#,
            r#"{"ts":"2022-08-17T13:00:00Z","t":5.0,"ws":6.0,"wd":7,"p":8.0}]},"#,
            r#"{"lat":60.1,"lon":24.2,"forecasts":["#,
            r#"{"ts":"2022-08-18T12:00:00Z","t":9.0,"ws":10.0,"wd":11,"p":12.0}]}"#,
            r#"]}"#
        );
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_unsorted_document_has_same_content() {
        let forecast = two_location_forecast();
        let unsorted = JsonWriter::new().encode(&forecast).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&unsorted).unwrap();

        let locations = value["locations"].as_array().unwrap();
        assert_eq!(locations.len(), 2);
        let total: usize = locations
            .iter()
            .map(|l| l["forecasts"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_empty_forecast() {
        let output = JsonWriter::new().encode(&Forecast::new()).unwrap();
        assert_eq!(output, br#"{"locations":[]}"#);
    }

    #[test]
    fn test_one_decimal_rendering() {
        let mut forecast = Forecast::new();
        let ts = Utc.with_ymd_and_hms(2022, 8, 17, 12, 0, 0).unwrap();
        forecast.insert(
            LocationKey::new(60.1, 24.2),
            ts,
            ForecastItem { temperature: 20.799988, wind_speed: 7.4772997, wind_direction: 207, precipitation: 0.1 },
        );

        let output = String::from_utf8(JsonWriter::new().encode(&forecast).unwrap()).unwrap();
        assert!(output.contains(r#""t":20.8,"ws":7.5,"wd":207,"p":0.1"#), "{}", output);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(9.850006), 9.9);
        assert_eq!(round_one_decimal(0.25), 0.2); // Tie to even
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(-1.25), -1.2);
        assert_eq!(round_one_decimal(5.0), 5.0);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }

    #[test]
    fn test_pretty_output_parses() {
        let output = JsonWriter::new()
            .with_pretty(true)
            .with_sorted(true)
            .encode(&two_location_forecast())
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["locations"][1]["forecasts"][0]["wd"], 11);
    }

    #[test]
    fn test_write_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("forecast.json");

        let written = JsonWriter::new().write_file(&two_location_forecast(), &path)?;
        assert_eq!(std::fs::metadata(&path)?.len() as usize, written);
        Ok(())
    }
}

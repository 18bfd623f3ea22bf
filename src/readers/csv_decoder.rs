use crate::error::{ProcessingError, Result};
use crate::models::GridRecord;
use crate::readers::RecordDecoder;

/// Decodes `quantity,valid_time,latitude,longitude,value` rows
pub struct CsvRecordDecoder {
    delimiter: u8,
    has_headers: bool,
}

impl CsvRecordDecoder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Without headers, columns are taken positionally
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

impl Default for CsvRecordDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordDecoder for CsvRecordDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<GridRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<GridRecord>().enumerate() {
            let record = row.map_err(|e| match e.position() {
                Some(position) => ProcessingError::decode(format!("line {}: {}", position.line(), e)),
                None => ProcessingError::decode(format!("record {}: {}", index + 1, e)),
            })?;
            records.push(record);
        }

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_decode_with_headers() {
        let input = "quantity,valid_time,latitude,longitude,value\n\
                     TMP, 2022-08-17T12:00:00Z, 59.920322999999996, 24.168623999999998, 293.95\n\
                     var192_140_242,2022-08-17T12:00:00Z,59.920322999999996,24.168623999999998,207.4\n";

        let records = CsvRecordDecoder::new().decode(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quantity_id, "TMP");
        assert_eq!(records[0].latitude, 59.920322999999996);
        assert_eq!(records[0].value, 293.95);
        assert_eq!(
            records[1].valid_time,
            Utc.with_ymd_and_hms(2022, 8, 17, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_decode_headerless_semicolon() {
        let input = "WIND;2022-08-17T13:00:00Z;60.1;24.2;5.0\n";
        let decoder = CsvRecordDecoder::new()
            .with_delimiter(b';')
            .with_headers(false);

        let records = decoder.decode(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity_id, "WIND");
        assert_eq!(records[0].value, 5.0);
    }

    #[test]
    fn test_malformed_row_fails_whole_decode() {
        let input = "quantity,valid_time,latitude,longitude,value\n\
                     TMP,2022-08-17T12:00:00Z,60.1,24.2,283.0\n\
                     TMP,not-a-time,60.1,24.2,283.0\n";

        let err = CsvRecordDecoder::new().decode(input.as_bytes()).unwrap_err();
        assert!(err.is_decode());
        // Header is line 1
        assert!(err.to_string().starts_with("Decode error: line 3:"));
    }

    #[test]
    fn test_empty_input() {
        let records = CsvRecordDecoder::new().decode(b"").unwrap();
        assert!(records.is_empty());
    }
}

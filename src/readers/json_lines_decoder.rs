use crate::error::{ProcessingError, Result};
use crate::models::GridRecord;
use crate::readers::RecordDecoder;

/// Decodes one JSON grid record per line; blank lines are skipped
#[derive(Default)]
pub struct JsonLinesDecoder;

impl JsonLinesDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonLinesDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<GridRecord>> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| ProcessingError::decode(format!("Invalid UTF-8: {}", e)))?;

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record: GridRecord = serde_json::from_str(line).map_err(|e| {
                ProcessingError::decode(format!("line {}: {}", index + 1, e))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}

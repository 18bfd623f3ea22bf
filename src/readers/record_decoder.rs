use crate::error::{ProcessingError, Result};
use crate::models::GridRecord;
use crate::readers::{CsvRecordDecoder, JsonLinesDecoder};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, FORMAT_CSV, FORMAT_JSON_LINES};
use clap::ValueEnum;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Turns raw bytes into grid records.
///
/// Implementations fail with [`ProcessingError::Decode`] when the input is
/// not a valid record sequence; a partial sequence is never returned.
pub trait RecordDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<GridRecord>>;

    fn name(&self) -> &'static str;
}

/// Textual dump formats with a bundled decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    #[value(alias = "ndjson")]
    Jsonl,
}

impl InputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Cannot infer input format without a file extension: {}",
                    path.display()
                ))
            })?;

        match extension.as_str() {
            "csv" | "txt" => Ok(InputFormat::Csv),
            "jsonl" | "ndjson" => Ok(InputFormat::Jsonl),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unsupported input extension '{}', expected one of: {}, {}",
                other, FORMAT_CSV, FORMAT_JSON_LINES
            ))),
        }
    }

    pub fn decoder(&self) -> Box<dyn RecordDecoder> {
        match self {
            InputFormat::Csv => Box::new(CsvRecordDecoder::new()),
            InputFormat::Jsonl => Box::new(JsonLinesDecoder::new()),
        }
    }
}

/// Loads an input file and hands its bytes to a decoder
pub struct InputReader {
    use_mmap: bool,
}

impl InputReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn decode_file(&self, path: &Path, decoder: &dyn RecordDecoder) -> Result<Vec<GridRecord>> {
        let records = if self.use_mmap {
            self.decode_mmap(path, decoder)?
        } else {
            self.decode_buffered(path, decoder)?
        };

        debug!(
            path = %path.display(),
            decoder = decoder.name(),
            records = records.len(),
            "Decoded input file"
        );

        Ok(records)
    }

    fn decode_buffered(&self, path: &Path, decoder: &dyn RecordDecoder) -> Result<Vec<GridRecord>> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        decoder.decode(&bytes)
    }

    fn decode_mmap(&self, path: &Path, decoder: &dyn RecordDecoder) -> Result<Vec<GridRecord>> {
        let file = File::open(path)?;
        // Empty files cannot be mapped on every platform
        if file.metadata()?.len() == 0 {
            return decoder.decode(&[]);
        }

        let mmap = unsafe { Mmap::map(&file)? };
        decoder.decode(&mmap)
    }
}

impl Default for InputReader {
    fn default() -> Self {
        Self::new()
    }
}

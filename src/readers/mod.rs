pub mod csv_decoder;
pub mod json_lines_decoder;
pub mod record_decoder;

pub use csv_decoder::CsvRecordDecoder;
pub use json_lines_decoder::JsonLinesDecoder;
pub use record_decoder::{InputFormat, InputReader, RecordDecoder};

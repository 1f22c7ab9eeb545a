pub mod csv;

pub use csv::{parse_escheatment_csv, ParsedBatch, SAMPLE_CSV};

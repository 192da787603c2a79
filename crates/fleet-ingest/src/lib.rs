//! Record parsing for the fleet import pipeline.
//!
//! Turns an uploaded spreadsheet into an ordered list of
//! [`Record`](fleet_model::Record)s keyed by column header, together with the
//! row-level problems found along the way.
//!
//! # Example
//!
//! ```ignore
//! use fleet_ingest::{CsvParser, RecordParser};
//!
//! let outcome = CsvParser::new().parse(b"Load ID,Customer\nL-1,Acme\n")?;
//! assert!(outcome.is_usable());
//! assert_eq!(outcome.data[0].value("Customer"), "Acme");
//! ```

mod csv;
mod error;
mod parser;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use self::csv::{
    CsvHeaders, MAX_CSV_FILE_SIZE, check_file_size_with_limit, detect_delimiter, normalize_header,
    parse_csv_bytes, read_csv_file, strip_bom,
};

// === Parser Seam ===
pub use parser::{CsvParser, RecordParser};

//! CSV upload reading.

mod header;
mod reader;

pub use header::{CsvHeaders, detect_delimiter, normalize_header};
pub(crate) use reader::io_error;
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size_with_limit, parse_csv_bytes, read_csv_file, strip_bom,
};

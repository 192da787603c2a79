//! CSV reading into header-keyed records.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use fleet_model::{ParseOutcome, ParseSummary, Record, RowParseError};

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, detect_delimiter};

/// Maximum upload size accepted by default (50 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 50 * 1024 * 1024;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub(crate) fn io_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Check file size against a limit before loading.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Rejects UTF-16 input and strips a UTF-8 BOM.
pub fn strip_bom(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    Ok(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
}

/// Reads a CSV file from disk.
pub fn read_csv_file(path: &Path, max_size: u64) -> Result<ParseOutcome> {
    check_file_size_with_limit(path, max_size)?;
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read upload");
    parse_csv_bytes(&bytes)
}

/// Parses an in-memory CSV upload.
///
/// The first non-empty line is the header row. Data rows whose cells are all
/// blank are skipped and counted. Rows with a field-count mismatch or cells
/// that are not valid UTF-8 are reported against their physical line number
/// and cause the outcome to be unsuccessful; the remaining rows are still
/// returned so the caller can show every problem at once.
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<ParseOutcome> {
    let bytes = strip_bom(bytes)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyFile);
    }

    let first_line = bytes
        .split(|&b| b == b'\n')
        .find(|line| !line.iter().all(u8::is_ascii_whitespace))
        .unwrap_or(bytes);
    let delimiter = detect_delimiter(&String::from_utf8_lossy(first_line));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut raw = ByteRecord::new();
    if !reader.read_byte_record(&mut raw)? {
        return Err(IngestError::EmptyFile);
    }
    let header_cells: Vec<String> = raw
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect();
    let headers = CsvHeaders::from_raw(&header_cells);
    if headers.is_empty() || headers.all_generated() {
        return Err(IngestError::NoHeaderDetected);
    }

    let mut data = Vec::new();
    let mut errors = Vec::new();
    let mut summary = ParseSummary::default();

    while reader.read_byte_record(&mut raw)? {
        let line = raw
            .position()
            .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));

        if raw.iter().all(|cell| cell.iter().all(u8::is_ascii_whitespace)) {
            summary.skipped_rows += 1;
            continue;
        }
        summary.total_rows += 1;

        match row_to_cells(&raw, &headers) {
            Ok(cells) => {
                data.push(Record::new(data.len() + 1, cells));
            }
            Err(problems) => {
                errors.push(RowParseError {
                    row: line,
                    errors: problems,
                });
            }
        }
    }

    summary.valid_rows = data.len();
    summary.invalid_rows = errors.len();

    if !errors.is_empty() {
        tracing::warn!(
            invalid = errors.len(),
            valid = data.len(),
            "upload contains rows that could not be parsed"
        );
    }

    Ok(ParseOutcome {
        success: errors.is_empty(),
        headers: headers.columns,
        data,
        errors,
        summary,
    })
}

/// Converts one byte record into header/value pairs, or the list of
/// problems that prevent it.
fn row_to_cells(
    raw: &ByteRecord,
    headers: &CsvHeaders,
) -> std::result::Result<Vec<(String, String)>, Vec<String>> {
    let mut problems = Vec::new();
    let expected = headers.len();

    let extra_non_blank = raw
        .iter()
        .skip(expected)
        .any(|cell| !cell.iter().all(u8::is_ascii_whitespace));
    if raw.len() > expected && extra_non_blank {
        problems.push(format!(
            "Too many fields: expected {expected}, found {}",
            raw.len()
        ));
    } else if raw.len() < expected {
        problems.push(format!(
            "Too few fields: expected {expected}, found {}",
            raw.len()
        ));
    }

    let mut cells = Vec::with_capacity(expected);
    for (idx, column) in headers.columns.iter().enumerate() {
        let value = match raw.get(idx) {
            Some(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => text.trim().to_string(),
                Err(_) => {
                    problems.push(format!("Invalid UTF-8 in column \"{column}\""));
                    continue;
                }
            },
            None => String::new(),
        };
        cells.push((column.clone(), value));
    }

    if problems.is_empty() {
        Ok(cells)
    } else {
        Err(problems)
    }
}

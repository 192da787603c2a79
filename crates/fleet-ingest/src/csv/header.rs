//! CSV header normalization and delimiter detection.

use std::collections::HashMap;

/// Delimiters tried when sniffing the header line.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Resolved header row of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeaders {
    /// Column names in file order, trimmed and unique.
    pub columns: Vec<String>,
    /// Columns whose raw header cell was blank and received a generated name.
    pub generated: Vec<usize>,
}

impl CsvHeaders {
    /// Builds a unique header row from raw header cells.
    ///
    /// Blank cells become `Column N` (1-based position). A name that repeats
    /// an earlier one gets a ` (2)`, ` (3)`, ... suffix so every record can be
    /// keyed unambiguously.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut columns = Vec::with_capacity(raw.len());
        let mut generated = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (idx, cell) in raw.iter().enumerate() {
            let mut name = normalize_header(cell.as_ref());
            if name.is_empty() {
                name = format!("Column {}", idx + 1);
                generated.push(idx);
            }

            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                let mut n = *count;
                let mut candidate = format!("{name} ({n})");
                while seen.contains_key(&candidate) {
                    n += 1;
                    candidate = format!("{name} ({n})");
                }
                seen.insert(candidate.clone(), 1);
                name = candidate;
            }
            columns.push(name);
        }

        Self { columns, generated }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when no raw header cell carried a name.
    pub fn all_generated(&self) -> bool {
        self.generated.len() == self.columns.len()
    }
}

/// Normalizes a header value by trimming whitespace and a stray BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Picks the delimiter that splits the header line into the most fields.
///
/// Only separators outside double quotes are counted. Falls back to a comma
/// when no candidate occurs.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;

    for byte in header_line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(pos) = CANDIDATE_DELIMITERS.iter().position(|&d| d == byte) {
            counts[pos] += 1;
        }
    }

    // Ties keep the earlier candidate, so commas win over semicolons.
    let mut best = 0;
    for (idx, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = idx;
        }
    }
    CANDIDATE_DELIMITERS[best]
}

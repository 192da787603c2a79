//! Parsed spreadsheet rows.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One parsed spreadsheet row: an ordered mapping from source column header
/// to raw cell value.
///
/// Records are immutable once parsed. The row number is the 1-based position
/// of the record in its record set; it is not part of the wire format, which
/// is a plain JSON object in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    row: usize,
    cells: Vec<(String, String)>,
}

impl Record {
    /// Creates a record from header/value pairs in column order.
    pub fn new(row: usize, cells: Vec<(String, String)>) -> Self {
        Self { row, cells }
    }

    /// Creates a record from any iterator of header/value pairs.
    pub fn from_pairs<I, K, V>(row: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            row,
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 1-based row number within the record set.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns a copy of this record carrying a different row number.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }

    /// Cell value for a header. The first column wins if a header repeats.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Cell value for a header, or the empty string when absent.
    pub fn value(&self, header: &str) -> &str {
        self.get(header).unwrap_or_default()
    }

    /// Headers in column order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of column header to cell value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((header, value)) = access.next_entry::<String, Option<String>>()? {
            cells.push((header, value.unwrap_or_default()));
        }
        Ok(Record { row: 0, cells })
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

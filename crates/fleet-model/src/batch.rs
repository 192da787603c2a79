//! Bounded slices of the record set used during submission.

use crate::error::{ModelError, Result};
use crate::record::Record;

/// Default number of records per submission request.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// A contiguous slice of at most `size` records. Exists only while a
/// submission runs.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub index: usize,
    pub offset: usize,
    pub records: &'a [Record],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 1-based number of the first row in the full record set.
    pub fn first_row(&self) -> usize {
        self.offset + 1
    }

    /// 1-based number of the last row in the full record set.
    pub fn last_row(&self) -> usize {
        self.offset + self.records.len()
    }
}

/// Splits `records` into consecutive batches of at most `size`.
pub fn partition(records: &[Record], size: usize) -> Result<Vec<Batch<'_>>> {
    if size == 0 {
        return Err(ModelError::ZeroBatchSize);
    }
    Ok(records
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            offset: index * size,
            records: chunk,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|row| Record::from_pairs(row, [("id", row.to_string())]))
            .collect()
    }

    #[test]
    fn partitions_into_ceil_batches() {
        let all = records(1200);
        let batches = partition(&all, 500).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1].offset, 500);
        assert_eq!(batches[1].first_row(), 501);
        assert_eq!(batches[2].len(), 200);
        assert_eq!(batches[2].last_row(), 1200);
    }

    #[test]
    fn empty_record_set_has_no_batches() {
        assert!(partition(&[], 500).unwrap().is_empty());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(partition(&records(3), 0).unwrap_err(), ModelError::ZeroBatchSize);
    }
}

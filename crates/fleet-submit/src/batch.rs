//! Sequential chunked submission.
//!
//! The run is a fold over the batches of the record set. Each batch is sent
//! only after the previous one has been fully processed, and a batch that
//! fails at the transport level is recorded and skipped rather than
//! aborting the run.

use fleet_model::{
    Batch, BatchOutcome, BatchStatus, ColumnMapping, FixedValues, ImportParams, ImportRunResult,
    Record, RowError, partition,
};

use crate::config::SubmitSettings;
use crate::endpoint::{BatchReport, ImportEndpoint, ImportRequest};
use crate::error::Result;

/// Field name used for the synthetic error of a failed batch.
pub const BATCH_ERROR_FIELD: &str = "batch";

/// Reported after every batch, successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitProgress {
    /// Zero-based index of the batch just processed.
    pub batch_index: usize,
    pub batch_count: usize,
    pub rows_processed: usize,
    pub total_rows: usize,
}

impl SubmitProgress {
    pub fn fraction(&self) -> f32 {
        if self.total_rows == 0 {
            return 1.0;
        }
        self.rows_processed as f32 / self.total_rows as f32
    }
}

/// Sends one batch, retrying retryable failures up to the configured limit.
///
/// Returns the final result together with the number of attempts made.
pub fn send_with_retry<E: ImportEndpoint + ?Sized>(
    endpoint: &E,
    request: &ImportRequest<'_>,
    settings: &SubmitSettings,
) -> (Result<BatchReport>, u32) {
    let max_attempts = settings.max_attempts();
    let mut attempt = 1;
    loop {
        match endpoint.submit_batch(request) {
            Err(error) if error.is_retryable() && attempt < max_attempts => {
                tracing::warn!(%error, attempt, max_attempts, "batch request failed; retrying");
                let delay = settings.retry_delay();
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                attempt += 1;
            }
            result => return (result, attempt),
        }
    }
}

/// Submits `records` in batches and accumulates the outcome.
///
/// `progress` is called once per batch, after the batch has been folded
/// into the result.
pub fn submit<E, F>(
    endpoint: &E,
    records: &[Record],
    mapping: &ColumnMapping,
    fixed: &FixedValues,
    params: &ImportParams,
    settings: &SubmitSettings,
    mut progress: F,
) -> ImportRunResult
where
    E: ImportEndpoint + ?Sized,
    F: FnMut(SubmitProgress),
{
    // batch_size() is never zero, so partitioning cannot fail.
    let batches = partition(records, settings.batch_size()).unwrap_or_default();
    let batch_count = batches.len();
    let base = ImportRequest::new(params, records, mapping, fixed);

    tracing::info!(
        entity_type = %params.entity_type,
        rows = records.len(),
        batches = batch_count,
        batch_size = settings.batch_size(),
        "starting import"
    );

    let mut rows_processed = 0;
    let run = batches
        .iter()
        .fold(ImportRunResult::default(), |mut run, batch| {
            let request = base.with_records(batch.records);
            let (result, attempts) = send_with_retry(endpoint, &request, settings);
            match result {
                Ok(report) => record_success(&mut run, batch, report, attempts),
                Err(error) => {
                    record_failure(&mut run, batch, batch_count, &error.to_string(), attempts);
                }
            }

            rows_processed += batch.len();
            progress(SubmitProgress {
                batch_index: batch.index,
                batch_count,
                rows_processed,
                total_rows: records.len(),
            });
            run
        });

    tracing::info!(
        created = run.created_count,
        updated = run.updated_count,
        errors = run.errors_count,
        failed_batches = run.failed_batches().count(),
        "import finished"
    );
    run
}

fn record_success(
    run: &mut ImportRunResult,
    batch: &Batch<'_>,
    report: BatchReport,
    attempts: u32,
) {
    tracing::debug!(
        batch = batch.index,
        created = report.created,
        updated = report.updated,
        errors = report.errors,
        "batch succeeded"
    );
    run.created_count += report.created;
    run.updated_count += report.updated;
    run.errors_count += report.errors;
    run.created_items.extend(report.details.created);
    run.errors.extend(
        report
            .details
            .errors
            .into_iter()
            .map(|e| e.offset_by(batch.offset)),
    );
    run.batches.push(BatchOutcome {
        index: batch.index,
        offset: batch.offset,
        rows: batch.len(),
        attempts,
        status: BatchStatus::Succeeded {
            created: report.created,
            updated: report.updated,
            errors: report.errors,
        },
    });
}

fn record_failure(
    run: &mut ImportRunResult,
    batch: &Batch<'_>,
    batch_count: usize,
    cause: &str,
    attempts: u32,
) {
    tracing::warn!(
        batch = batch.index,
        rows = batch.len(),
        attempts,
        cause,
        "batch failed; continuing with the next batch"
    );
    run.errors_count += batch.len();
    run.errors.push(RowError::new(
        batch.first_row(),
        BATCH_ERROR_FIELD,
        format!(
            "batch {} of {batch_count} failed (rows {}-{}): {cause}",
            batch.index + 1,
            batch.first_row(),
            batch.last_row()
        ),
    ));
    run.batches.push(BatchOutcome {
        index: batch.index,
        offset: batch.offset,
        rows: batch.len(),
        attempts,
        status: BatchStatus::Failed {
            cause: cause.to_string(),
        },
    });
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::TransportError;
    use fleet_model::PreviewResult;

    /// Fails with `error` for the first `failures` calls, then succeeds.
    struct Flaky {
        failures: u32,
        error: TransportError,
        calls: Cell<u32>,
    }

    impl ImportEndpoint for Flaky {
        fn preview(&self, _request: &ImportRequest<'_>) -> Result<PreviewResult> {
            Ok(PreviewResult::default())
        }

        fn submit_batch(&self, request: &ImportRequest<'_>) -> Result<BatchReport> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if call <= self.failures {
                return Err(self.error.clone());
            }
            Ok(BatchReport {
                created: request.records.len(),
                ..BatchReport::default()
            })
        }
    }

    fn one_record() -> (Vec<Record>, ColumnMapping, FixedValues, ImportParams) {
        (
            vec![Record::from_pairs(1, [("VIN", "1FT")])],
            ColumnMapping::new(),
            FixedValues::new(),
            ImportParams::new("trucks"),
        )
    }

    #[test]
    fn connect_errors_are_retried_once() {
        let endpoint = Flaky {
            failures: 1,
            error: TransportError::Connect("refused".into()),
            calls: Cell::new(0),
        };
        let settings = SubmitSettings::default().with_retries(1, 0);
        let (records, mapping, fixed, params) = one_record();
        let request = ImportRequest::new(&params, &records, &mapping, &fixed);

        let (result, attempts) = send_with_retry(&endpoint, &request, &settings);
        assert!(result.is_ok());
        assert_eq!(attempts, 2);
    }

    #[test]
    fn timeouts_are_not_retried() {
        let endpoint = Flaky {
            failures: 5,
            error: TransportError::Timeout("60s".into()),
            calls: Cell::new(0),
        };
        let settings = SubmitSettings::default().with_retries(3, 0);
        let (records, mapping, fixed, params) = one_record();

        let run = submit(&endpoint, &records, &mapping, &fixed, &params, &settings, |_| {});
        assert_eq!(endpoint.calls.get(), 1);
        assert_eq!(run.errors_count, 1);
        assert_eq!(run.batches[0].attempts, 1);
        assert_eq!(run.errors[0].field, BATCH_ERROR_FIELD);
        assert_eq!(run.errors[0].row, 1);
    }

    #[test]
    fn retries_stop_at_the_limit() {
        let endpoint = Flaky {
            failures: 10,
            error: TransportError::Status {
                status: 503,
                message: "unavailable".into(),
            },
            calls: Cell::new(0),
        };
        let settings = SubmitSettings::default().with_retries(2, 0);
        let (records, mapping, fixed, params) = one_record();

        let run = submit(&endpoint, &records, &mapping, &fixed, &params, &settings, |_| {});
        assert_eq!(endpoint.calls.get(), 3);
        assert_eq!(run.batches[0].attempts, 3);
        assert!(run.batches[0].is_failed());
    }

    #[test]
    fn empty_record_set_sends_nothing() {
        let endpoint = Flaky {
            failures: 0,
            error: TransportError::Network(String::new()),
            calls: Cell::new(0),
        };
        let (_, mapping, fixed, params) = one_record();
        let mut reports = 0;
        let run = submit(
            &endpoint,
            &[],
            &mapping,
            &fixed,
            &params,
            &SubmitSettings::default(),
            |_| reports += 1,
        );
        assert_eq!(endpoint.calls.get(), 0);
        assert_eq!(reports, 0);
        assert_eq!(run, ImportRunResult::default());
    }
}

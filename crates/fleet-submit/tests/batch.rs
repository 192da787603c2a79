use std::cell::{Cell, RefCell};

use fleet_model::{
    ColumnMapping, FixedValues, ImportParams, PreviewResult, Record, RowError, RowRef,
};
use fleet_submit::{
    BATCH_ERROR_FIELD, BatchDetails, BatchReport, ImportEndpoint, ImportRequest, SubmitProgress,
    SubmitSettings, TransportError, preview, submit,
};

/// Records every batch it receives and answers from a script.
///
/// Each record whose `Status` cell is `bad` comes back as a row error at
/// its batch-local position; the rest are created. Calls listed in
/// `fail_calls` (1-based) fail with a connection reset.
#[derive(Default)]
struct ScriptedEndpoint {
    fail_calls: Vec<usize>,
    calls: Cell<usize>,
    batch_sizes: RefCell<Vec<usize>>,
    first_rows: RefCell<Vec<String>>,
}

impl ImportEndpoint for ScriptedEndpoint {
    fn preview(&self, request: &ImportRequest<'_>) -> fleet_submit::Result<PreviewResult> {
        assert!(request.preview_only);
        let total = request.records.len();
        Ok(PreviewResult {
            total_rows: total,
            valid_count: total,
            valid: (1..=total).map(RowRef::Index).collect(),
            ..PreviewResult::default()
        })
    }

    fn submit_batch(&self, request: &ImportRequest<'_>) -> fleet_submit::Result<BatchReport> {
        assert!(!request.preview_only);
        let call = self.calls.get() + 1;
        self.calls.set(call);
        self.batch_sizes.borrow_mut().push(request.records.len());
        self.first_rows
            .borrow_mut()
            .push(request.records[0].value("Load ID").to_string());

        if self.fail_calls.contains(&call) {
            return Err(TransportError::Network("connection reset by peer".into()));
        }

        let errors: Vec<RowError> = request
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.value("Status") == "bad")
            .map(|(i, _)| RowError::new(i + 1, "status", "unknown status"))
            .collect();
        Ok(BatchReport {
            created: request.records.len() - errors.len(),
            updated: 0,
            errors: errors.len(),
            details: BatchDetails {
                created: Vec::new(),
                errors,
            },
        })
    }
}

fn loads(n: usize, bad_rows: &[usize]) -> Vec<Record> {
    (1..=n)
        .map(|row| {
            let status = if bad_rows.contains(&row) { "bad" } else { "booked" };
            Record::from_pairs(row, [("Load ID", format!("L-{row}")), ("Status", status.into())])
        })
        .collect()
}

fn settings() -> SubmitSettings {
    SubmitSettings::default().with_retries(0, 0)
}

#[test]
fn batches_are_sent_in_order_and_counts_add_up() {
    let endpoint = ScriptedEndpoint::default();
    let records = loads(1_234, &[]);
    let mut progress: Vec<SubmitProgress> = Vec::new();

    let run = submit(
        &endpoint,
        &records,
        &ColumnMapping::new(),
        &FixedValues::new(),
        &ImportParams::new("loads"),
        &settings(),
        |p| progress.push(p),
    );

    assert_eq!(endpoint.calls.get(), 3);
    assert_eq!(*endpoint.batch_sizes.borrow(), vec![500, 500, 234]);
    assert_eq!(*endpoint.first_rows.borrow(), vec!["L-1", "L-501", "L-1001"]);
    assert_eq!(run.processed_count(), 1_234);
    assert!(run.is_complete_success());

    assert_eq!(progress.len(), 3);
    assert_eq!(progress[2].rows_processed, 1_234);
    assert_eq!(progress[2].batch_count, 3);
    assert!((progress[2].fraction() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn row_errors_are_offset_to_file_rows() {
    let endpoint = ScriptedEndpoint::default();
    let records = loads(1_000, &[503]);

    let run = submit(
        &endpoint,
        &records,
        &ColumnMapping::new(),
        &FixedValues::new(),
        &ImportParams::new("loads"),
        &settings(),
        |_| {},
    );

    assert_eq!(run.errors_count, 1);
    assert_eq!(run.errors, vec![RowError::new(503, "status", "unknown status")]);
}

#[test]
fn failed_batch_is_recorded_and_the_run_continues() {
    let endpoint = ScriptedEndpoint {
        fail_calls: vec![2],
        ..ScriptedEndpoint::default()
    };
    let records = loads(1_200, &[10, 1_150]);

    let run = submit(
        &endpoint,
        &records,
        &ColumnMapping::new(),
        &FixedValues::new(),
        &ImportParams::new("loads"),
        &settings(),
        |_| {},
    );

    assert_eq!(endpoint.calls.get(), 3);
    assert_eq!(run.created_count, 499 + 199);
    assert_eq!(run.errors_count, 500 + 2);
    assert_eq!(run.processed_count(), 1_200);

    let batch_error = run
        .errors
        .iter()
        .find(|e| e.field == BATCH_ERROR_FIELD)
        .unwrap();
    assert_eq!(batch_error.row, 501);
    assert!(batch_error.error.contains("batch 2 of 3"));
    assert!(batch_error.error.contains("rows 501-1000"));

    let rows: Vec<usize> = run.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![10, 501, 1_150]);
    assert_eq!(run.failed_batches().count(), 1);
}

#[test]
fn preview_is_a_single_flagged_request() {
    let endpoint = ScriptedEndpoint::default();
    let records = loads(1_200, &[]);
    let result = preview(
        &endpoint,
        &records,
        &ColumnMapping::new(),
        &FixedValues::new(),
        &ImportParams::new("loads"),
    )
    .unwrap();

    assert_eq!(endpoint.calls.get(), 0);
    assert_eq!(result.total_rows, 1_200);
    assert!(result.is_consistent());
}

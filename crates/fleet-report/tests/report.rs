//! Results reporting over a run with one failed batch.

use fleet_model::{BatchOutcome, BatchStatus, ImportRunResult, RowError};
use fleet_report::{
    render_error_table, render_run_table, summarize, write_errors_csv, write_errors_csv_file,
};

fn partial_run() -> ImportRunResult {
    ImportRunResult {
        created_count: 698,
        updated_count: 0,
        errors_count: 502,
        created_items: vec![],
        errors: vec![
            RowError::new(4, "vin", "must not be empty"),
            RowError::new(
                501,
                "batch",
                "batch 2 of 3 failed (rows 501-1000): connection reset",
            ),
            RowError::new(1003, "", "duplicate load, already imported"),
        ],
        batches: vec![
            BatchOutcome {
                index: 0,
                offset: 0,
                rows: 500,
                attempts: 1,
                status: BatchStatus::Succeeded {
                    created: 499,
                    updated: 0,
                    errors: 1,
                },
            },
            BatchOutcome {
                index: 1,
                offset: 500,
                rows: 500,
                attempts: 2,
                status: BatchStatus::Failed {
                    cause: "connection reset".into(),
                },
            },
            BatchOutcome {
                index: 2,
                offset: 1000,
                rows: 200,
                attempts: 1,
                status: BatchStatus::Succeeded {
                    created: 199,
                    updated: 0,
                    errors: 1,
                },
            },
        ],
    }
}

#[test]
fn error_log_text_is_one_line_per_error() {
    let summary = summarize(&partial_run());
    assert_eq!(summary.created_count, 698);
    assert_eq!(summary.errors_count, 502);
    assert!(summary.has_errors());
    insta::assert_snapshot!(summary.error_log_text(), @r"
    Row 4 [vin]: must not be empty
    Row 501 [batch]: batch 2 of 3 failed (rows 501-1000): connection reset
    Row 1003 [-]: duplicate load, already imported
    ");
}

#[test]
fn errors_csv_keeps_every_error() {
    let mut out = Vec::new();
    write_errors_csv(&partial_run(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "row,field,error");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "4,vin,must not be empty");
    assert_eq!(lines[3], "1003,,\"duplicate load, already imported\"");
}

#[test]
fn errors_csv_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("errors.csv");
    write_errors_csv_file(&partial_run(), &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][0], "501");
    assert_eq!(&rows[1][1], "batch");
}

#[test]
fn tables_show_counts() {
    let run = partial_run();
    let totals = render_run_table(&run);
    assert!(totals.contains("698"));
    assert!(totals.contains("502"));
    assert!(totals.contains("1200"));
    assert!(totals.contains("3 (rows 1001-1200)"));

    let errors = render_error_table(&run, 10);
    assert!(errors.contains("must not be empty"));
    assert!(errors.contains("1003"));
}

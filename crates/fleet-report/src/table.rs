//! Terminal tables for run and preview results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fleet_model::{BatchStatus, ImportRunResult, PreviewResult};

use crate::summary::format_error_line;

/// Width used when the terminal width is unknown.
const TABLE_WIDTH: u16 = 120;

/// Totals table: one row per batch plus a total row.
pub fn render_run_table(result: &ImportRunResult) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Batch"),
        header_cell("Rows"),
        header_cell("Created"),
        header_cell("Updated"),
        header_cell("Errors"),
        header_cell("Attempts"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for batch in &result.batches {
        let (created, updated, errors, status) = match &batch.status {
            BatchStatus::Succeeded {
                created,
                updated,
                errors,
            } => (
                Cell::new(created),
                Cell::new(updated),
                count_cell(*errors, Color::Yellow),
                Cell::new("ok").fg(Color::Green),
            ),
            BatchStatus::Failed { cause } => (
                dim_cell("-"),
                dim_cell("-"),
                count_cell(batch.rows, Color::Red),
                Cell::new(format!("failed: {cause}")).fg(Color::Red),
            ),
        };
        table.add_row(vec![
            Cell::new(format!(
                "{} (rows {}-{})",
                batch.index + 1,
                batch.offset + 1,
                batch.offset + batch.rows
            )),
            Cell::new(batch.rows),
            created,
            updated,
            errors,
            Cell::new(batch.attempts),
            status,
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.batches.iter().map(|b| b.rows).sum::<usize>())
            .add_attribute(Attribute::Bold),
        Cell::new(result.created_count).add_attribute(Attribute::Bold),
        Cell::new(result.updated_count).add_attribute(Attribute::Bold),
        count_cell(result.errors_count, Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table.to_string()
}

/// Error lines as a table, truncated to `limit` rows.
pub fn render_error_table(result: &ImportRunResult, limit: usize) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for error in result.errors.iter().take(limit) {
        table.add_row(vec![
            Cell::new(error.row),
            Cell::new(&error.field).fg(Color::Yellow),
            Cell::new(&error.error),
        ]);
    }
    if result.errors.len() > limit {
        let hidden = result.errors.len() - limit;
        tracing::debug!(hidden, "error table truncated");
        table.add_row(vec![
            dim_cell("..."),
            dim_cell(""),
            dim_cell(format!("{hidden} more (see the full error log)")),
        ]);
    }
    table.to_string()
}

/// Preview classification counts with the first invalid rows.
pub fn render_preview_table(preview: &PreviewResult, limit: usize) -> String {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Class"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Valid").fg(Color::Green), Cell::new(preview.valid_count)]);
    table.add_row(vec![
        Cell::new("Warnings").fg(Color::Yellow),
        count_cell(preview.warning_count, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Invalid").fg(Color::Red),
        count_cell(preview.invalid_count, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(preview.total_rows).add_attribute(Attribute::Bold),
    ]);

    let mut out = table.to_string();
    for error in preview.invalid.iter().take(limit) {
        out.push('\n');
        out.push_str(&format_error_line(error));
    }
    out
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::{BatchOutcome, RowError};

    fn run() -> ImportRunResult {
        ImportRunResult {
            created_count: 499,
            updated_count: 0,
            errors_count: 501,
            created_items: vec![],
            errors: vec![
                RowError::new(12, "vin", "must not be empty"),
                RowError::new(501, "batch", "batch 2 of 2 failed"),
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
                        cause: "connection refused".into(),
                    },
                },
            ],
        }
    }

    #[test]
    fn run_table_lists_batches_and_totals() {
        let rendered = render_run_table(&run());
        assert!(rendered.contains("1 (rows 1-500)"));
        assert!(rendered.contains("2 (rows 501-1000)"));
        assert!(rendered.contains("failed: connection refused"));
        assert!(rendered.contains("TOTAL"));
        assert!(rendered.contains("1000"));
    }

    #[test]
    fn error_table_is_truncated() {
        let rendered = render_error_table(&run(), 1);
        assert!(rendered.contains("must not be empty"));
        assert!(!rendered.contains("batch 2 of 2"));
        assert!(rendered.contains("1 more"));
    }

    #[test]
    fn preview_table_lists_invalid_rows() {
        let preview = PreviewResult {
            total_rows: 3,
            valid_count: 1,
            warning_count: 1,
            invalid_count: 1,
            invalid: vec![RowError::new(3, "vin", "already exists")],
            ..PreviewResult::default()
        };
        let rendered = render_preview_table(&preview, 5);
        assert!(rendered.contains("Invalid"));
        assert!(rendered.ends_with("Row 3 [vin]: already exists"));
    }
}

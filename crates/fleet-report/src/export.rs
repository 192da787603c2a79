//! CSV export of run errors.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use fleet_model::ImportRunResult;

use crate::error::{ReportError, Result};

/// Writes `row,field,error` lines for every error of the run.
pub fn write_errors_csv<W: Write>(result: &ImportRunResult, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["row", "field", "error"])?;
    for error in &result.errors {
        let row = error.row.to_string();
        csv.write_record([row.as_str(), error.field.as_str(), error.error.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the error CSV to a file, replacing it if present.
pub fn write_errors_csv_file(result: &ImportRunResult, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    write_errors_csv(result, file)?;
    tracing::info!(path = %path.display(), errors = result.errors.len(), "wrote error report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::RowError;

    #[test]
    fn quotes_fields_with_commas() {
        let run = ImportRunResult {
            errors: vec![RowError::new(2, "rate", "expected a number, got \"abc\"")],
            ..ImportRunResult::default()
        };
        let mut out = Vec::new();
        write_errors_csv(&run, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "row,field,error\n2,rate,\"expected a number, got \"\"abc\"\"\"\n"
        );
    }
}

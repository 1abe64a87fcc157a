//! Reconciliation of recorded outcomes against the expected catalog
//!
//! Both files are ordered line sequences and the header participates.
//! The first discrepancy wins; nothing is sorted or diffed beyond it.

use std::path::Path;
use tracing::info;

use crate::error::{HarnessError, HarnessResult};

/// Compare the record file against the golden file, field by field.
pub fn reconcile_files(expected: &Path, actual: &Path) -> HarnessResult<()> {
    let expected_lines = read_lines(expected)?;
    let actual_lines = read_lines(actual)?;
    reconcile_lines(&expected_lines, &actual_lines)?;
    info!("Output matches expected ({} line(s))", expected_lines.len());
    Ok(())
}

/// Strict positional comparison. Line numbers and field numbers in the
/// errors are 1-based.
pub fn reconcile_lines(expected: &[String], actual: &[String]) -> HarnessResult<()> {
    if expected.len() != actual.len() {
        return Err(HarnessError::LineCountMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (idx, (expected_line, actual_line)) in expected.iter().zip(actual).enumerate() {
        let line = idx + 1;
        let expected_fields: Vec<&str> = expected_line.split(',').collect();
        let actual_fields: Vec<&str> = actual_line.split(',').collect();

        if expected_fields.len() != actual_fields.len() {
            return Err(HarnessError::FieldCountMismatch {
                line,
                expected: expected_fields.len(),
                actual: actual_fields.len(),
            });
        }

        for (fidx, (expected_field, actual_field)) in
            expected_fields.iter().zip(&actual_fields).enumerate()
        {
            if expected_field != actual_field {
                return Err(HarnessError::FieldMismatch {
                    line,
                    field: fidx + 1,
                    expected: expected_field.to_string(),
                    actual: actual_field.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn read_lines(path: &Path) -> HarnessResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

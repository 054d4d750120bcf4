// ==========================================
// Community Dashboard Loader - import error types
// ==========================================
// Tool: thiserror derive
// Every variant is fatal for the run and aborts before the staging load
// ==========================================

use crate::domain::{ReportingPeriod, SourceColumn, TargetType};
use chrono::NaiveDate;
use crate::importer::reference_list::UnmappedFinding;
use thiserror::Error;

/// Import layer error
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Source file =====
    #[error("source read failed ({path}): {message}")]
    SourceRead { path: String, message: String },

    // ===== Date column =====
    #[error("invalid date value (row {row}): {value:?} - dates must be DD/MM/YYYY")]
    InvalidDate { row: usize, value: String },

    #[error(
        "data expected for {expected} but none found - please investigate (dates present: {})",
        describe_dates(.found)
    )]
    MissingPeriodData {
        expected: ReportingPeriod,
        /// Distinct dates in the file, ascending
        found: Vec<NaiveDate>,
    },

    // ===== Reference lists =====
    #[error("unmapped values, please investigate: {}", describe_findings(.0))]
    UnmappedValue(Vec<UnmappedFinding>),

    // ===== Typing =====
    #[error("type coercion failed (row {row}, column {column}): {value:?} is not a valid {target}")]
    TypeCoercion {
        row: usize,
        column: SourceColumn,
        value: String,
        target: TargetType,
    },
}

impl ImportError {
    pub fn source_read(path: impl Into<String>, message: impl ToString) -> Self {
        ImportError::SourceRead {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

fn describe_dates(found: &[NaiveDate]) -> String {
    if found.is_empty() {
        return "none".to_string();
    }
    found
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_findings(findings: &[UnmappedFinding]) -> String {
    findings
        .iter()
        .map(|f| {
            format!(
                "{} not in sheet '{}' ({} rows): {:?}",
                f.column, f.sheet, f.rows, f.values
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;

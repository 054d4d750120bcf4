// ==========================================
// Community Dashboard Loader - record validator
// ==========================================
// Flow: date validation → reference lists (IndicatorName, Speciality, Source) → typing
// Output: ValidatedRecordSet, or the first failing stage's error
// ==========================================

use crate::domain::{
    RawRecord, RawRecordSet, RawValue, ReportingPeriod, SourceColumn, ValidatedRecord,
    ValidatedRecordSet,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::reference_list::check_reference_list;
use crate::importer::workbook::SheetSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Strict day/month/year format of the Date column
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// ReferenceSheets - column ↔ reference sheet
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSheets {
    pub indicator_name: String,
    pub speciality: String,
    pub source: String,
}

impl Default for ReferenceSheets {
    fn default() -> Self {
        Self {
            indicator_name: "Indicator Name".to_string(),
            speciality: "Specialties".to_string(),
            source: "Sources".to_string(),
        }
    }
}

impl ReferenceSheets {
    /// Checks in execution order
    pub fn checks(&self) -> [(SourceColumn, &str); 3] {
        [
            (SourceColumn::IndicatorName, self.indicator_name.as_str()),
            (SourceColumn::Speciality, self.speciality.as_str()),
            (SourceColumn::Source, self.source.as_str()),
        ]
    }
}

// ==========================================
// Date validation
// ==========================================

/// Parse one Date cell. Workbook date cells pass through unchanged.
pub fn parse_strict_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Date(d) => Some(*d),
        RawValue::Text(s) => {
            let parts: Vec<&str> = s.split('/').collect();
            let shape_ok = parts.len() == 3
                && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
                && parts[0].len() <= 2
                && parts[1].len() <= 2
                && parts[2].len() == 4;
            if !shape_ok {
                return None;
            }
            NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
        }
        RawValue::Empty | RawValue::Number(_) => None,
    }
}

/// Parse every Date cell and require at least one row on `period`.
///
/// Returns a new set whose Date cells are `RawValue::Date`, so running it
/// again on its own output is a no-op.
pub fn validate_dates(records: &RawRecordSet, period: ReportingPeriod) -> ImportResult<RawRecordSet> {
    let mut parsed = Vec::with_capacity(records.len());
    for record in records {
        let date = parse_strict_date(&record.date).ok_or_else(|| ImportError::InvalidDate {
            row: record.row_number,
            value: record.date.to_string(),
        })?;
        parsed.push(record.with_date(date));
    }

    let has_period = parsed
        .iter()
        .any(|r| matches!(r.date, RawValue::Date(d) if period.matches(d)));
    if !has_period {
        let found: BTreeSet<NaiveDate> = parsed
            .iter()
            .filter_map(|r| match r.date {
                RawValue::Date(d) => Some(d),
                _ => None,
            })
            .collect();
        return Err(ImportError::MissingPeriodData {
            expected: period,
            found: found.into_iter().collect(),
        });
    }

    Ok(RawRecordSet::new(parsed))
}

// ==========================================
// Typing
// ==========================================

fn coercion_error(record: &RawRecord, column: SourceColumn) -> ImportError {
    ImportError::TypeCoercion {
        row: record.row_number,
        column,
        value: record.get(column).to_string(),
        target: column.target_type(),
    }
}

fn coerce_required_text(record: &RawRecord, column: SourceColumn) -> ImportResult<String> {
    match record.get(column) {
        RawValue::Empty => Err(coercion_error(record, column)),
        other => Ok(other.as_text()),
    }
}

fn coerce_optional_text(record: &RawRecord, column: SourceColumn) -> Option<String> {
    match record.get(column) {
        RawValue::Empty => None,
        other => Some(other.as_text()),
    }
}

fn coerce_float(record: &RawRecord, column: SourceColumn) -> ImportResult<Option<f64>> {
    let value = match record.get(column) {
        RawValue::Empty => return Ok(None),
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| coercion_error(record, column))?,
        RawValue::Date(_) => return Err(coercion_error(record, column)),
    };
    // NaN loads as NULL
    Ok(if value.is_nan() { None } else { Some(value) })
}

fn coerce_date(record: &RawRecord) -> ImportResult<NaiveDate> {
    match record.date {
        RawValue::Date(d) => Ok(d),
        _ => Err(coercion_error(record, SourceColumn::Date)),
    }
}

/// Cast every column to its target type (see `SourceColumn::target_type`).
pub fn coerce_types(records: &RawRecordSet) -> ImportResult<ValidatedRecordSet> {
    let mut typed = Vec::with_capacity(records.len());
    for record in records {
        typed.push(ValidatedRecord {
            indicator_name: coerce_required_text(record, SourceColumn::IndicatorName)?,
            period: coerce_optional_text(record, SourceColumn::Period),
            date: coerce_date(record)?,
            data_value: coerce_float(record, SourceColumn::DataValue)?,
            data_value2: coerce_float(record, SourceColumn::DataValue2)?,
            speciality: coerce_required_text(record, SourceColumn::Speciality)?,
            source: coerce_required_text(record, SourceColumn::Source)?,
        });
    }
    Ok(ValidatedRecordSet::new(typed))
}

// ==========================================
// RecordValidator
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    sheets: ReferenceSheets,
}

impl RecordValidator {
    pub fn new(sheets: ReferenceSheets) -> Self {
        Self { sheets }
    }

    /// Full validation of a raw record set read from `source`.
    ///
    /// All three reference-list checks run before failing, so one error
    /// reports every unmapped column of the file.
    pub fn validate(
        &self,
        records: &RawRecordSet,
        source: &mut dyn SheetSource,
        period: ReportingPeriod,
    ) -> ImportResult<ValidatedRecordSet> {
        let dated = validate_dates(records, period)?;
        debug!(period = %period, rows = dated.len(), "date validation passed");

        let mut findings = Vec::new();
        for (column, sheet) in self.sheets.checks() {
            if let Some(finding) = check_reference_list(&dated, source, sheet, column)? {
                findings.push(finding);
            }
        }
        if !findings.is_empty() {
            return Err(ImportError::UnmappedValue(findings));
        }

        let typed = coerce_types(&dated)?;
        info!(rows = typed.len(), "records validated");
        Ok(typed)
    }
}

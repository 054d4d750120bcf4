// ==========================================
// Community Dashboard Loader - reference list validation
// ==========================================
// Allow-list: first column of a reference sheet, no header row
// Each categorical column is checked against its own, freshly read list
// ==========================================

use crate::domain::{RawRecordSet, SourceColumn};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook::SheetSource;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub type AllowList = BTreeSet<String>;

/// Distinct unmapped values found in one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedFinding {
    pub column: SourceColumn,
    pub sheet: String,
    /// Sorted, duplicates collapsed
    pub values: Vec<String>,
    /// Number of rows carrying an unmapped value
    pub rows: usize,
}

/// Read the allow-list from the first column of `sheet_name`. Blank cells are ignored.
pub fn allowed_values(source: &mut dyn SheetSource, sheet_name: &str) -> ImportResult<AllowList> {
    let sheet = source.read_sheet(sheet_name)?;
    let allowed: AllowList = sheet
        .rows
        .iter()
        .filter_map(|row| row.first())
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.as_text())
        .collect();

    debug!(sheet = sheet_name, values = allowed.len(), "allow-list loaded");
    Ok(allowed)
}

/// Distinct values of `column` that are not in `allowed`.
pub fn find_unmapped(
    records: &RawRecordSet,
    column: SourceColumn,
    allowed: &AllowList,
) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| r.get(column).as_text())
        .filter(|v| !allowed.contains(v))
        .collect()
}

/// Check one column; `Ok(None)` when every value is mapped.
pub fn check_reference_list(
    records: &RawRecordSet,
    source: &mut dyn SheetSource,
    sheet_name: &str,
    column: SourceColumn,
) -> ImportResult<Option<UnmappedFinding>> {
    let allowed = allowed_values(source, sheet_name)?;
    let unmapped = find_unmapped(records, column, &allowed);
    if unmapped.is_empty() {
        return Ok(None);
    }

    let rows = records
        .iter()
        .filter(|r| unmapped.contains(&r.get(column).as_text()))
        .count();

    warn!(
        column = %column,
        sheet = sheet_name,
        distinct = unmapped.len(),
        rows,
        "unmapped values found"
    );

    Ok(Some(UnmappedFinding {
        column,
        sheet: sheet_name.to_string(),
        values: unmapped.into_iter().collect(),
        rows,
    }))
}

/// Validation gate for a single column.
pub fn validate_reference_list(
    records: &RawRecordSet,
    source: &mut dyn SheetSource,
    sheet_name: &str,
    column: SourceColumn,
) -> ImportResult<()> {
    match check_reference_list(records, source, sheet_name, column)? {
        Some(finding) => Err(ImportError::UnmappedValue(vec![finding])),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawRecord, RawValue};
    use crate::importer::workbook::MemoryWorkbook;

    fn record(row: usize, indicator: &str, source: &str) -> RawRecord {
        RawRecord {
            row_number: row,
            indicator_name: RawValue::text(indicator),
            period: RawValue::text("Mar-24"),
            date: RawValue::text("01/03/2024"),
            data_value: RawValue::Number(1.0),
            data_value2: RawValue::Empty,
            speciality: RawValue::text("Podiatry"),
            source: RawValue::text(source),
        }
    }

    #[test]
    fn test_find_unmapped_collapses_duplicates() {
        let records = RawRecordSet::new(vec![
            record(2, "Referrals", "EMIS"),
            record(3, "Contacts", "EMIS"),
            record(4, "Contacts", "EMIS"),
            record(5, "Waits", "EMIS"),
        ]);
        let allowed: AllowList = ["Referrals".to_string()].into_iter().collect();

        let unmapped = find_unmapped(&records, SourceColumn::IndicatorName, &allowed);
        let expected: BTreeSet<String> =
            ["Contacts".to_string(), "Waits".to_string()].into_iter().collect();
        assert_eq!(unmapped, expected);
    }

    #[test]
    fn test_blank_value_is_unmapped() {
        let records = RawRecordSet::new(vec![record(2, "", "EMIS")]);
        let allowed: AllowList = ["Referrals".to_string()].into_iter().collect();

        let unmapped = find_unmapped(&records, SourceColumn::IndicatorName, &allowed);
        assert!(unmapped.contains(""));
    }

    #[test]
    fn test_allowed_values_reads_first_column_without_header() {
        let mut wb = MemoryWorkbook::new("mem").with_sheet(
            "Sources",
            vec![
                vec![RawValue::text("EMIS"), RawValue::text("comment")],
                vec![RawValue::Empty],
                vec![RawValue::text("SystmOne")],
            ],
        );

        let allowed = allowed_values(&mut wb, "Sources").unwrap();
        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains("EMIS"));
        assert!(allowed.contains("SystmOne"));
        assert!(!allowed.contains("comment"));
    }

    #[test]
    fn test_validate_reference_list_reports_rows() {
        let records = RawRecordSet::new(vec![
            record(2, "Referrals", "Rio"),
            record(3, "Referrals", "Rio"),
            record(4, "Referrals", "EMIS"),
        ]);
        let mut wb = MemoryWorkbook::new("mem").with_list_sheet("Sources", &["EMIS"]);

        let err = validate_reference_list(&records, &mut wb, "Sources", SourceColumn::Source)
            .unwrap_err();
        match err {
            ImportError::UnmappedValue(findings) => {
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].values, vec!["Rio".to_string()]);
                assert_eq!(findings[0].rows, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lists_are_independent() {
        // "EMIS" is a valid Source but not a valid IndicatorName
        let records = RawRecordSet::new(vec![record(2, "EMIS", "EMIS")]);
        let mut wb = MemoryWorkbook::new("mem")
            .with_list_sheet("Sources", &["EMIS"])
            .with_list_sheet("Indicator Name", &["Referrals"]);

        assert!(validate_reference_list(&records, &mut wb, "Sources", SourceColumn::Source).is_ok());
        assert!(validate_reference_list(
            &records,
            &mut wb,
            "Indicator Name",
            SourceColumn::IndicatorName
        )
        .is_err());
    }
}

// ==========================================
// Community Dashboard Loader - source loader
// ==========================================
// Reads the data sheet and projects the seven fixed columns
// Header: first row; extra columns ignored; fully blank rows skipped
// ==========================================

use crate::domain::{RawRecord, RawRecordSet, RawValue, SourceColumn};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook::SheetSource;
use std::collections::HashMap;
use tracing::debug;

/// Default data worksheet
pub const DEFAULT_DATA_SHEET: &str = "Sheet1";

/// Load `sheet_name` from `source` as a RawRecordSet.
pub fn load_source(source: &mut dyn SheetSource, sheet_name: &str) -> ImportResult<RawRecordSet> {
    let sheet = source.read_sheet(sheet_name)?;

    let mut rows = sheet.rows.into_iter();
    let header_row = rows.next().ok_or_else(|| {
        ImportError::source_read(
            source.location(),
            format!("worksheet '{}' has no header row", sheet_name),
        )
    })?;

    // header text → column index (first occurrence wins)
    let mut header_index: HashMap<String, usize> = HashMap::new();
    for (idx, cell) in header_row.iter().enumerate() {
        header_index.entry(cell.as_text()).or_insert(idx);
    }

    let missing: Vec<&str> = SourceColumn::ALL
        .iter()
        .filter(|c| !header_index.contains_key(c.header()))
        .map(|c| c.header())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::source_read(
            source.location(),
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    let positions: Vec<usize> = SourceColumn::ALL
        .iter()
        .map(|c| header_index[c.header()])
        .collect();

    let mut records = Vec::new();
    for (offset, row) in rows.enumerate() {
        let row_number = sheet.first_row + offset + 1;
        let cell = |col: usize| -> RawValue {
            row.get(positions[col]).cloned().unwrap_or(RawValue::Empty)
        };

        let record = RawRecord {
            row_number,
            indicator_name: cell(0),
            period: cell(1),
            date: cell(2),
            data_value: cell(3),
            data_value2: cell(4),
            speciality: cell(5),
            source: cell(6),
        };

        if SourceColumn::ALL.iter().all(|c| record.get(*c).is_empty()) {
            continue;
        }
        records.push(record);
    }

    debug!(sheet = sheet_name, rows = records.len(), "source sheet loaded");
    Ok(RawRecordSet::new(records))
}

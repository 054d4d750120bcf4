// ==========================================
// Community Dashboard Loader - workbook access
// ==========================================
// SheetSource: named-sheet reader used by the loader and the reference-list checks
// ExcelWorkbook: calamine-backed (.xlsx / .xls / .xlsb / .ods)
// MemoryWorkbook: in-memory sheets (no fixture file needed)
// ==========================================

use crate::domain::RawValue;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Rows of one worksheet, cells already converted to `RawValue`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    /// 1-based worksheet row number of `rows[0]`
    pub first_row: usize,
    pub rows: Vec<Vec<RawValue>>,
}

impl SheetData {
    pub fn new(rows: Vec<Vec<RawValue>>) -> Self {
        Self { first_row: 1, rows }
    }
}

// ==========================================
// SheetSource Trait
// ==========================================
pub trait SheetSource {
    /// Human-readable origin, used in error messages
    fn location(&self) -> String;

    /// Read a worksheet by name. A missing sheet is a `SourceRead` error.
    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<SheetData>;
}

// ==========================================
// ExcelWorkbook
// ==========================================
pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    pub fn open<P: AsRef<Path>>(file_path: P) -> ImportResult<Self> {
        let path = file_path.as_ref();
        let location = path.display().to_string();

        if !path.exists() {
            return Err(ImportError::source_read(location, "file not found"));
        }

        let workbook = open_workbook_auto(path)
            .map_err(|e| ImportError::source_read(location.clone(), e))?;

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SheetSource for ExcelWorkbook {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<SheetData> {
        if !self.workbook.sheet_names().iter().any(|s| s == sheet_name) {
            return Err(ImportError::source_read(
                self.location(),
                format!("worksheet '{}' not found", sheet_name),
            ));
        }

        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ImportError::source_read(self.location(), e))?;

        let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
        let rows = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(SheetData { first_row, rows })
    }
}

/// calamine cell → RawValue
fn convert_cell(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Empty,
        Data::String(s) => RawValue::text(s),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Text(b.to_string().to_uppercase()),
        // as_datetime honours the workbook's 1900/1904 date system
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(|d| RawValue::Date(d.date()))
            .unwrap_or(RawValue::Number(dt.as_f64())),
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(RawValue::Date)
            .unwrap_or_else(|| RawValue::text(s)),
        Data::DurationIso(s) => RawValue::text(s),
        Data::Error(e) => RawValue::Text(format!("#{:?}", e)),
    }
}

// ==========================================
// MemoryWorkbook
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    name: String,
    sheets: HashMap<String, SheetData>,
}

impl MemoryWorkbook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: HashMap::new(),
        }
    }

    pub fn with_sheet(mut self, sheet_name: impl Into<String>, rows: Vec<Vec<RawValue>>) -> Self {
        self.sheets.insert(sheet_name.into(), SheetData::new(rows));
        self
    }

    /// Single unheaded column of values, as the reference sheets are laid out
    pub fn with_list_sheet(self, sheet_name: impl Into<String>, values: &[&str]) -> Self {
        let rows = values.iter().map(|v| vec![RawValue::text(v)]).collect();
        self.with_sheet(sheet_name, rows)
    }
}

impl SheetSource for MemoryWorkbook {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<SheetData> {
        self.sheets.get(sheet_name).cloned().ok_or_else(|| {
            ImportError::source_read(
                self.name.clone(),
                format!("worksheet '{}' not found", sheet_name),
            )
        })
    }
}

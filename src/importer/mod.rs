// ==========================================
// Community Dashboard Loader - import layer
// ==========================================
// Responsibility: read the monthly extract and validate it
// Flow: workbook → source loader → record validator (→ reference lists)
// ==========================================

pub mod error;
pub mod record_validator;
pub mod reference_list;
pub mod source_loader;
pub mod workbook;

pub use error::{ImportError, ImportResult};
pub use record_validator::{
    coerce_types, parse_strict_date, validate_dates, RecordValidator, ReferenceSheets, DATE_FORMAT,
};
pub use reference_list::{
    allowed_values, check_reference_list, find_unmapped, validate_reference_list, AllowList,
    UnmappedFinding,
};
pub use source_loader::{load_source, DEFAULT_DATA_SHEET};
pub use workbook::{ExcelWorkbook, MemoryWorkbook, SheetData, SheetSource};

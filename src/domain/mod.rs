// ==========================================
// Community Dashboard Loader - domain layer
// ==========================================
// Responsibility: reporting period, raw and validated record sets
// Red line: no file I/O, no database access
// ==========================================

pub mod period;
pub mod record;

pub use period::ReportingPeriod;
pub use record::{
    RawRecord, RawRecordSet, RawValue, SourceColumn, TargetType, ValidatedRecord,
    ValidatedRecordSet,
};

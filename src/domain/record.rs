// ==========================================
// Community Dashboard Loader - record sets
// ==========================================
// RawRecordSet: cells as read from Sheet1 (untyped)
// ValidatedRecordSet: typed rows, ready for staging
// ==========================================

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

// ==========================================
// SourceColumn - fixed projection of Sheet1
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceColumn {
    IndicatorName,
    Period,
    Date,
    DataValue,
    DataValue2,
    Speciality,
    Source,
}

/// Target type of a column after coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetType {
    Text,
    Date,
    Float,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Text => write!(f, "text"),
            TargetType::Date => write!(f, "date"),
            TargetType::Float => write!(f, "float"),
        }
    }
}

impl SourceColumn {
    /// Projection order of the loader
    pub const ALL: [SourceColumn; 7] = [
        SourceColumn::IndicatorName,
        SourceColumn::Period,
        SourceColumn::Date,
        SourceColumn::DataValue,
        SourceColumn::DataValue2,
        SourceColumn::Speciality,
        SourceColumn::Source,
    ];

    /// Header text in Sheet1
    pub fn header(&self) -> &'static str {
        match self {
            SourceColumn::IndicatorName => "IndicatorName",
            SourceColumn::Period => "Period",
            SourceColumn::Date => "Date",
            SourceColumn::DataValue => "DataValue",
            SourceColumn::DataValue2 => "DataValue2",
            SourceColumn::Speciality => "Speciality",
            SourceColumn::Source => "Source",
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            SourceColumn::Date => TargetType::Date,
            SourceColumn::DataValue | SourceColumn::DataValue2 => TargetType::Float,
            _ => TargetType::Text,
        }
    }
}

impl fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ==========================================
// RawValue - one untyped cell
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
    /// Cell stored as a date by the workbook, or a Date value already parsed
    Date(NaiveDate),
}

impl RawValue {
    /// Text cell, trimmed; blank text collapses to `Empty`.
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }

    /// Textual form used for allow-list comparison and text coercion.
    ///
    /// Integral numbers render without a fractional part (`12.0` → `"12"`).
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            RawValue::Number(n) => n.to_string(),
            RawValue::Date(d) => d.format("%d/%m/%Y").to_string(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Empty => write!(f, "<blank>"),
            other => f.write_str(&other.as_text()),
        }
    }
}

// ==========================================
// RawRecord / RawRecordSet
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based worksheet row (header is row 1)
    pub row_number: usize,
    pub indicator_name: RawValue,
    pub period: RawValue,
    pub date: RawValue,
    pub data_value: RawValue,
    pub data_value2: RawValue,
    pub speciality: RawValue,
    pub source: RawValue,
}

impl RawRecord {
    pub fn get(&self, column: SourceColumn) -> &RawValue {
        match column {
            SourceColumn::IndicatorName => &self.indicator_name,
            SourceColumn::Period => &self.period,
            SourceColumn::Date => &self.date,
            SourceColumn::DataValue => &self.data_value,
            SourceColumn::DataValue2 => &self.data_value2,
            SourceColumn::Speciality => &self.speciality,
            SourceColumn::Source => &self.source,
        }
    }

    /// Copy of this row with the Date cell replaced by a parsed date.
    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self {
            date: RawValue::Date(date),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecordSet {
    records: Vec<RawRecord>,
}

impl RawRecordSet {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RawRecordSet {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ==========================================
// ValidatedRecord / ValidatedRecordSet
// ==========================================
/// Typed row. Blank Period / DataValue / DataValue2 cells load as NULL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRecord {
    pub indicator_name: String,
    pub period: Option<String>,
    pub date: NaiveDate,
    pub data_value: Option<f64>,
    pub data_value2: Option<f64>,
    pub speciality: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedRecordSet {
    records: Vec<ValidatedRecord>,
}

impl ValidatedRecordSet {
    pub fn new(records: Vec<ValidatedRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidatedRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ValidatedRecord] {
        &self.records
    }
}

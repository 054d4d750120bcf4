// ==========================================
// Community Dashboard Loader - reporting period
// ==========================================
// A reporting period is always the 1st of a calendar month
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default source file-name pattern (`March 2024-Community.xlsx`)
pub const DEFAULT_FILE_NAME_PATTERN: &str = "%B %Y-Community.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod(NaiveDate);

impl ReportingPeriod {
    /// First day of the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        // day 1 exists in every month
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Month preceding the one containing `today`, rolling back the year in January.
    pub fn previous_month(today: NaiveDate) -> Self {
        let (year, month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };

        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(first) => Self(first),
            None => Self::containing(today),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// True when `date` is exactly the period's first day.
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.0 == date
    }

    /// Render a strftime pattern against the period, e.g. `%B %Y-Community.xlsx`.
    pub fn file_name(&self, pattern: &str) -> String {
        self.0.format(pattern).to_string()
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<ReportingPeriod> for NaiveDate {
    fn from(period: ReportingPeriod) -> Self {
        period.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_month_mid_year() {
        let period = ReportingPeriod::previous_month(ymd(2024, 4, 17));
        assert_eq!(period.first_day(), ymd(2024, 3, 1));
    }

    #[test]
    fn test_previous_month_january_rolls_year() {
        let period = ReportingPeriod::previous_month(ymd(2024, 1, 31));
        assert_eq!(period.first_day(), ymd(2023, 12, 1));
    }

    #[test]
    fn test_previous_month_every_month() {
        for month in 2..=12 {
            let period = ReportingPeriod::previous_month(ymd(2025, month, 1));
            assert_eq!(period.first_day(), ymd(2025, month - 1, 1));
        }
    }

    #[test]
    fn test_file_name_uses_month_name() {
        let period = ReportingPeriod::containing(ymd(2024, 3, 9));
        assert_eq!(
            period.file_name(DEFAULT_FILE_NAME_PATTERN),
            "March 2024-Community.xlsx"
        );
    }

    #[test]
    fn test_display() {
        let period = ReportingPeriod::containing(ymd(2023, 12, 25));
        assert_eq!(period.to_string(), "2023-12-01");
    }
}

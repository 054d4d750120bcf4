// ==========================================
// Community Dashboard Loader - period resolver
// ==========================================

use crate::config::Clock;
use crate::domain::ReportingPeriod;

/// The month a run expects data for: the one before the clock's current month.
pub fn resolve_reporting_period(clock: &dyn Clock) -> ReportingPeriod {
    ReportingPeriod::previous_month(clock.today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn test_resolves_previous_month() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        assert_eq!(
            resolve_reporting_period(&clock).first_day(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_january_resolves_to_december() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(
            resolve_reporting_period(&clock).first_day(),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }
}

//! Pure date and amount computations for the payment scheduler.
//!
//! The billing day never drifts: every cycle targets the investment's
//! original created-date day-of-month, clamped to the length of the target
//! month. February and 30-day months therefore shorten a cycle without
//! changing subsequent ones.

use chrono::{Datelike, NaiveDate};

/// Number of days in the given month, leap-year aware.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .expect("first of a month always has a predecessor")
}

/// Due date of the cycle following `anchor`.
///
/// The month advances by one (rolling the year over from December) and the
/// day is `billing_day` - the investment's original created-date day, not the
/// anchor's day - clamped to the last valid day of the target month.
pub fn next_due_date(anchor: NaiveDate, billing_day: u32) -> NaiveDate {
    let (year, month) = if anchor.month() == 12 {
        (anchor.year() + 1, 1)
    } else {
        (anchor.year(), anchor.month() + 1)
    };
    let day = billing_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("day clamped to month length")
}

/// Interest amount for one cycle: `round(principal * ratio)`. Callers pass
/// `Investment::effective_ratio`, which folds in the default.
pub fn payment_amount(principal: f64, ratio: f64) -> f64 {
    (principal * ratio).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29); // leap year
        assert_eq!(days_in_month(2000, 2), 29); // divisible by 400
        assert_eq!(days_in_month(1900, 2), 28); // divisible by 100 only
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test]
    fn test_next_due_date_plain_month() {
        assert_eq!(next_due_date(date(2026, 3, 15), 15), date(2026, 4, 15));
    }

    #[test]
    fn test_next_due_date_year_rollover() {
        assert_eq!(next_due_date(date(2026, 12, 10), 10), date(2027, 1, 10));
    }

    #[test]
    fn test_next_due_date_clamps_to_short_month() {
        // Created on the 31st: the next month only has 30 days.
        assert_eq!(next_due_date(date(2026, 3, 31), 31), date(2026, 4, 30));
        // February clamps hardest.
        assert_eq!(next_due_date(date(2026, 1, 31), 31), date(2026, 2, 28));
        assert_eq!(next_due_date(date(2024, 1, 31), 31), date(2024, 2, 29));
    }

    #[test]
    fn test_billing_day_does_not_drift_after_clamp() {
        // Jan 31 -> Feb 28 -> Mar 31: the clamped February cycle must not
        // pull later cycles down to the 28th.
        let feb = next_due_date(date(2026, 1, 31), 31);
        assert_eq!(feb, date(2026, 2, 28));
        let mar = next_due_date(feb, 31);
        assert_eq!(mar, date(2026, 3, 31));
        let apr = next_due_date(mar, 31);
        assert_eq!(apr, date(2026, 4, 30));
        let may = next_due_date(apr, 31);
        assert_eq!(may, date(2026, 5, 31));
    }

    #[test]
    fn test_payment_amount_rounds() {
        assert_eq!(payment_amount(1000.0, 0.025), 25.0);
        assert_eq!(payment_amount(1010.0, 0.025), 25.0); // 25.25 -> 25
        assert_eq!(payment_amount(1030.0, 0.025), 26.0); // 25.75 -> 26
    }
}

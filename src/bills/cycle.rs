//! Date math for monthly bill cycles.
//!
//! Two deliberately separate calculators live here:
//!
//! - [cycle_bounds_from_due_day] finds the current cycle window used for
//!   paid/due/overdue classification.
//! - [next_monthly_due] is a simple one-month-forward helper used only for
//!   displaying a bill's next due day.
//!
//! They look similar but are not interchangeable: the cycle bounds are
//! anchored to "now" and roll the clamped cycle start forward, while the
//! display helper is anchored to the last payment. Keep them separate.

use time::{Date, Month};

/// The current monthly billing period for one bill, as the half-open window
/// `[cycle_start, next_due)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleBounds {
    /// The most recent occurrence of the bill's due day on or before "now".
    pub cycle_start: Date,
    /// The cycle start advanced one calendar month.
    pub next_due: Date,
}

/// Build a date from `year`, `month`, and `day`, clamping `day` to the last
/// day of the month when the month is too short (e.g. day 31 in February).
fn clamp_to_month(year: i32, month: Month, day: u8) -> Date {
    let day = day.min(month.length(year));
    Date::from_calendar_date(year, month, day).expect("clamped day is always within the month")
}

fn month_before(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        _ => (year, month.previous()),
    }
}

fn month_after(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::December => (year + 1, Month::January),
        _ => (year, month.next()),
    }
}

/// Find the current cycle window for a bill whose due day-of-month is
/// `due_day`, relative to `now`.
///
/// The cycle start is the latest date with day `due_day` (clamped to month
/// end) that is on or before `now`: the candidate in `now`'s month is used
/// if it has already occurred, otherwise the previous month's. `next_due`
/// advances the cycle start itself by one calendar month, so a clamped start
/// (day 31 in February becomes the 28th) rolls forward from the clamped day.
/// That is what lets a bill's next due date slip before "now" at month-end
/// boundaries, which is the only way a monthly bill can become overdue.
pub fn cycle_bounds_from_due_day(due_day: u8, now: Date) -> CycleBounds {
    let candidate = clamp_to_month(now.year(), now.month(), due_day);
    let cycle_start = if candidate <= now {
        candidate
    } else {
        let (year, month) = month_before(now.year(), now.month());
        clamp_to_month(year, month, due_day)
    };

    let (year, month) = month_after(cycle_start.year(), cycle_start.month());
    let next_due = clamp_to_month(year, month, cycle_start.day());

    CycleBounds {
        cycle_start,
        next_due,
    }
}

/// The next scheduled due date one calendar month after `last_payment`,
/// clamped to month end.
///
/// Display helper only; flag classification goes through
/// [cycle_bounds_from_due_day] instead.
pub fn next_monthly_due(last_payment: Date) -> Date {
    let (year, month) = month_after(last_payment.year(), last_payment.month());
    clamp_to_month(year, month, last_payment.day())
}

#[cfg(test)]
mod cycle_bounds_tests {
    use time::macros::date;

    use super::{CycleBounds, cycle_bounds_from_due_day};

    #[test]
    fn due_day_already_passed_this_month() {
        let got = cycle_bounds_from_due_day(5, date!(2025 - 08 - 08));

        assert_eq!(
            got,
            CycleBounds {
                cycle_start: date!(2025 - 08 - 05),
                next_due: date!(2025 - 09 - 05),
            }
        );
    }

    #[test]
    fn due_day_is_today() {
        let got = cycle_bounds_from_due_day(8, date!(2025 - 08 - 08));

        assert_eq!(got.cycle_start, date!(2025 - 08 - 08));
        assert_eq!(got.next_due, date!(2025 - 09 - 08));
    }

    #[test]
    fn due_day_not_yet_reached_uses_previous_month() {
        let got = cycle_bounds_from_due_day(20, date!(2025 - 08 - 08));

        assert_eq!(
            got,
            CycleBounds {
                cycle_start: date!(2025 - 07 - 20),
                next_due: date!(2025 - 08 - 20),
            }
        );
    }

    #[test]
    fn previous_month_crosses_year_boundary() {
        let got = cycle_bounds_from_due_day(20, date!(2025 - 01 - 08));

        assert_eq!(got.cycle_start, date!(2024 - 12 - 20));
        assert_eq!(got.next_due, date!(2025 - 01 - 20));
    }

    #[test]
    fn short_month_clamps_cycle_start() {
        // Due day 31 cannot occur in February; the start clamps to the 28th.
        let got = cycle_bounds_from_due_day(31, date!(2025 - 03 - 15));

        assert_eq!(got.cycle_start, date!(2025 - 02 - 28));
        assert_eq!(got.next_due, date!(2025 - 03 - 28));
    }

    #[test]
    fn clamped_next_due_can_precede_now() {
        // Between the 28th and the 31st of March the previous (clamped)
        // cycle has ended but the due day has not come round again.
        let got = cycle_bounds_from_due_day(31, date!(2025 - 03 - 30));

        assert!(
            got.next_due < date!(2025 - 03 - 30),
            "want next due {} before now, got it after",
            got.next_due
        );
    }

    #[test]
    fn leap_february_clamps_to_29th() {
        let got = cycle_bounds_from_due_day(31, date!(2024 - 03 - 15));

        assert_eq!(got.cycle_start, date!(2024 - 02 - 29));
        assert_eq!(got.next_due, date!(2024 - 03 - 29));
    }
}

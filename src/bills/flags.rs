//! Classifies each bill against its current monthly cycle.

use std::collections::{BTreeMap, BTreeSet};

use time::{Date, Duration};

use super::{
    cycle::{CycleBounds, cycle_bounds_from_due_day, next_monthly_due},
    group::RecurringBillGroup,
};

/// How many days ahead an unpaid bill is flagged as due soon.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// The payment status of every bill, keyed by bill name.
///
/// The three name sets are pairwise disjoint: paid-this-cycle is evaluated
/// first and is exclusive, and an unpaid bill is at most one of overdue or
/// due soon. Ordered collections keep the output sorted and deduplicated,
/// so repeated computations over the same data compare equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillFlags {
    /// Bills whose last payment falls inside the current cycle.
    pub paid_this_cycle: BTreeSet<String>,
    /// Unpaid bills due within the look-ahead window.
    pub due_soon: BTreeSet<String>,
    /// Unpaid bills whose next due date has already passed.
    pub overdue: BTreeSet<String>,
    /// Each bill's next scheduled due day-of-month, one month after its last
    /// payment. Display data only; it plays no part in classification.
    pub due_day_map: BTreeMap<String, u8>,
}

impl BillFlags {
    /// Bills needing attention: the union of due soon and overdue. A bill
    /// appears at most once even though the union spans two sets.
    pub fn due_names(&self) -> BTreeSet<&str> {
        self.due_soon
            .iter()
            .chain(self.overdue.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Classify every bill group against `now`.
///
/// Per bill, the due day is the UTC day-of-month of the last payment, and
/// the current cycle window comes from [cycle_bounds_from_due_day]. A bill
/// is paid iff its last payment falls within the window; only unpaid bills
/// can be overdue (next due before `now`) or due soon (next due within
/// `window_days` of `now`). Anything else is simply due further in the
/// future and carries no flag.
pub fn compute_bill_flags(
    groups: &[RecurringBillGroup],
    now: Date,
    window_days: i64,
) -> BillFlags {
    let window_end = now + Duration::days(window_days);
    let mut flags = BillFlags::default();

    for group in groups {
        let due_day = group.last_payment.day();
        let CycleBounds {
            cycle_start,
            next_due,
        } = cycle_bounds_from_due_day(due_day, now);

        flags
            .due_day_map
            .insert(group.name.clone(), next_monthly_due(group.last_payment).day());

        let paid = group.last_payment >= cycle_start && group.last_payment < next_due;
        if paid {
            flags.paid_this_cycle.insert(group.name.clone());
            continue;
        }

        if next_due < now {
            flags.overdue.insert(group.name.clone());
        } else if next_due <= window_end {
            flags.due_soon.insert(group.name.clone());
        }
    }

    flags
}

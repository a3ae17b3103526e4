//! The recurring-bill payment-status engine.
//!
//! Raw transactions flow one way through three stages:
//!
//! 1. [group_recurring_bills] folds a user's recurring bill payments into
//!    one [RecurringBillGroup] per bill name.
//! 2. [compute_bill_flags] derives each bill's monthly cycle from its last
//!    payment and classifies it as paid this cycle, due soon, or overdue.
//! 3. [BillsEngine] combines groups and flags into summary totals, counts,
//!    and annotated transaction lists.
//!
//! Every stage is a pure function of its input; nothing here writes to the
//! store or caches across calls.

mod cycle;
mod engine;
mod flags;
mod group;

pub use cycle::{CycleBounds, cycle_bounds_from_due_day, next_monthly_due};
pub use engine::{BillSummary, BillsEngine, TransactionWithStatus};
pub use flags::{BillFlags, DEFAULT_WINDOW_DAYS, compute_bill_flags};
pub use group::{RecurringBillGroup, group_recurring_bills};

//! The exposed read operations of the bills engine.
//!
//! Each operation is an async, side-effect-free function of
//! `(user_id, now)`: it reads a snapshot of the user's bill transactions,
//! derives groups and flags once into a request-scoped view, and answers
//! from that view. Nothing is cached across calls, so results can never go
//! stale, and concurrent calls need no coordination.

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error, Transaction, UserID,
    bills::{
        flags::{BillFlags, DEFAULT_WINDOW_DAYS, compute_bill_flags},
        group::{RecurringBillGroup, group_recurring_bills},
    },
    parse_iso_date,
    stores::BillTransactionStore,
};

/// The fixed summary bucket titles, in display order.
const SUMMARY_TITLES: [&str; 3] = ["Paid Bills", "Total Upcoming", "Due Soon"];

/// Theme colours for the summary buckets, matching the frontend's CSS
/// custom properties.
const SUMMARY_THEMES: [&str; 3] = [
    "var(--color-green)",
    "var(--color-yellow)",
    "var(--color-cyan)",
];

/// One of the three named dollar-total buckets on the bills overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillSummary {
    /// A stable slug id derived from the name, e.g. "paid-bills".
    pub id: String,
    /// The bucket title: "Paid Bills", "Total Upcoming", or "Due Soon".
    pub name: String,
    /// The bucket's dollar total.
    pub amount: f64,
    /// The bucket's theme colour.
    pub theme: String,
}

/// A bills-category transaction decorated with its bill's payment status.
///
/// Transactions whose name has no recurring bill group carry all-false
/// flags and no due day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithStatus {
    /// The underlying transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Whether the bill was paid this cycle.
    pub paid: bool,
    /// Whether the bill is unpaid and due within the look-ahead window.
    pub due_soon: bool,
    /// Whether the bill is unpaid and past its next due date.
    pub overdue: bool,
    /// The bill's next scheduled due day-of-month, if it has one.
    pub due_day: Option<u8>,
}

/// Everything one request needs, computed once from a single store snapshot.
///
/// This is the request-scoped memo: building it is the only store access an
/// operation performs, so repeated lookups within one call cannot disagree
/// with each other, and nothing survives the call to go stale.
struct BillsView {
    groups: Vec<RecurringBillGroup>,
    flags: BillFlags,
}

impl BillsView {
    /// Bills that are unpaid but not yet close enough to be flagged: due
    /// further in the future.
    fn upcoming_names(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|group| group.name.as_str())
            .filter(|name| {
                !self.flags.paid_this_cycle.contains(*name)
                    && !self.flags.due_soon.contains(*name)
                    && !self.flags.overdue.contains(*name)
            })
            .collect()
    }

    /// The actual amount paid this cycle, summed over paid bills.
    fn paid_total(&self) -> f64 {
        self.groups
            .iter()
            .filter(|group| self.flags.paid_this_cycle.contains(&group.name))
            .map(|group| group.last_amount)
            .sum()
    }

    /// The estimated upcoming total. No invoice exists yet for these bills,
    /// so the historical average stands in for the amount.
    fn upcoming_total(&self) -> f64 {
        let upcoming: Vec<&str> = self.upcoming_names();
        self.groups
            .iter()
            .filter(|group| upcoming.contains(&group.name.as_str()))
            .map(|group| group.avg_amount)
            .sum()
    }

    /// The estimated total across due-soon and overdue bills.
    fn due_total(&self) -> f64 {
        let due = self.flags.due_names();
        self.groups
            .iter()
            .filter(|group| due.contains(group.name.as_str()))
            .map(|group| group.avg_amount)
            .sum()
    }
}

/// Resolve the reference instant for a computation.
///
/// `None` means the UTC wall clock; tests and cycle-boundary callers pass an
/// explicit ISO-8601 date or datetime instead.
fn parse_now(now: Option<&str>) -> Result<Date, Error> {
    match now {
        Some(text) => parse_iso_date(text),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}

/// The recurring-bill payment-status engine.
///
/// Holds a read-only transaction store and the due-soon look-ahead window.
/// All operations take the resolved user scope as `Option<UserID>`: `None`
/// (no authenticated user) short-circuits to an empty result rather than an
/// error, and `now` as an optional ISO-8601 override of the wall clock for
/// deterministic cycle-boundary behaviour.
#[derive(Debug, Clone)]
pub struct BillsEngine<S> {
    store: S,
    window_days: i64,
}

impl<S> BillsEngine<S>
where
    S: BillTransactionStore,
{
    /// Create an engine over `store` with the default 7-day due-soon window.
    pub fn new(store: S) -> Self {
        Self {
            store,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Override the due-soon look-ahead window.
    pub fn with_window_days(mut self, window_days: i64) -> Self {
        self.window_days = window_days;
        self
    }

    /// Fetch the user's recurring bill payments and derive groups and flags
    /// once for this request.
    fn view(&self, user_id: UserID, now: Date) -> Result<BillsView, Error> {
        let payments = self.store.recurring_bill_transactions(user_id)?;
        let groups = group_recurring_bills(&payments);
        let flags = compute_bill_flags(&groups, now, self.window_days);

        Ok(BillsView { groups, flags })
    }

    /// The three fixed summary buckets: "Paid Bills" (actual amounts paid
    /// this cycle), "Total Upcoming" (average amounts of unflagged unpaid
    /// bills), and "Due Soon" (average amounts of due-soon and overdue
    /// bills).
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `now` or a stored date cannot be
    /// parsed, or [Error::SqlError] on an unexpected store failure.
    pub async fn bills_summary(
        &self,
        user_id: Option<UserID>,
        now: Option<&str>,
    ) -> Result<Vec<BillSummary>, Error> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };
        let view = self.view(user_id, parse_now(now)?)?;

        let amounts = [view.paid_total(), view.upcoming_total(), view.due_total()];
        Ok(SUMMARY_TITLES
            .into_iter()
            .zip(SUMMARY_THEMES)
            .zip(amounts)
            .map(|((name, theme), amount)| BillSummary {
                id: name.to_lowercase().replace(' ', "-"),
                name: name.to_owned(),
                amount,
                theme: theme.to_owned(),
            })
            .collect())
    }

    /// Every bills-category transaction for the user, newest first, each
    /// annotated with its bill's payment status.
    ///
    /// Non-recurring transactions appear too: they never form a bill group,
    /// so their flags are all false and they carry no due day.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `now` or a stored date cannot be
    /// parsed, or [Error::SqlError] on an unexpected store failure.
    pub async fn bill_transactions_with_status(
        &self,
        user_id: Option<UserID>,
        now: Option<&str>,
    ) -> Result<Vec<TransactionWithStatus>, Error> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };
        let base = self.store.bill_transactions(user_id)?;
        let view = self.view(user_id, parse_now(now)?)?;

        Ok(base
            .into_iter()
            .map(|transaction| {
                let paid = view.flags.paid_this_cycle.contains(&transaction.name);
                let due_soon = view.flags.due_soon.contains(&transaction.name);
                let overdue = view.flags.overdue.contains(&transaction.name);
                let due_day = view.flags.due_day_map.get(&transaction.name).copied();

                TransactionWithStatus {
                    transaction,
                    paid,
                    due_soon,
                    overdue,
                    due_day,
                }
            })
            .collect())
    }

    /// How many distinct bills were paid this cycle.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `now` or a stored date cannot be
    /// parsed, or [Error::SqlError] on an unexpected store failure.
    pub async fn paid_bills_count(
        &self,
        user_id: Option<UserID>,
        now: Option<&str>,
    ) -> Result<usize, Error> {
        let Some(user_id) = user_id else {
            return Ok(0);
        };
        let view = self.view(user_id, parse_now(now)?)?;

        Ok(view.flags.paid_this_cycle.len())
    }

    /// How many distinct bills are unpaid but not yet due soon or overdue.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `now` or a stored date cannot be
    /// parsed, or [Error::SqlError] on an unexpected store failure.
    pub async fn upcoming_bills_count(
        &self,
        user_id: Option<UserID>,
        now: Option<&str>,
    ) -> Result<usize, Error> {
        let Some(user_id) = user_id else {
            return Ok(0);
        };
        let view = self.view(user_id, parse_now(now)?)?;

        Ok(view.upcoming_names().len())
    }

    /// How many distinct bills are due soon or overdue. A bill in both
    /// conditions counts once.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `now` or a stored date cannot be
    /// parsed, or [Error::SqlError] on an unexpected store failure.
    pub async fn due_bills_count(
        &self,
        user_id: Option<UserID>,
        now: Option<&str>,
    ) -> Result<usize, Error> {
        let Some(user_id) = user_id else {
            return Ok(0);
        };
        let view = self.view(user_id, parse_now(now)?)?;

        Ok(view.flags.due_names().len())
    }

    /// How many distinct recurring bills the user has, regardless of status.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `now` or a stored date cannot be
    /// parsed, or [Error::SqlError] on an unexpected store failure.
    pub async fn recurring_bills_count(
        &self,
        user_id: Option<UserID>,
        now: Option<&str>,
    ) -> Result<usize, Error> {
        let Some(user_id) = user_id else {
            return Ok(0);
        };
        let view = self.view(user_id, parse_now(now)?)?;

        Ok(view.groups.len())
    }
}

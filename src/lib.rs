//! Billwatch is the recurring-bill engine for a personal finance app.
//!
//! Given one user's transaction history, the engine infers which named
//! recurring bills exist, derives each bill's monthly due-cycle from its
//! payment history, and classifies every bill as paid this cycle, due soon,
//! or overdue. The results are served as summary totals, counts, and
//! per-transaction payment-status annotations.
//!
//! Everything the engine produces is derived and ephemeral: each call reads
//! a snapshot of the transaction store and recomputes from scratch, so there
//! is no state that can go stale between requests. Session resolution is the
//! caller's job; operations take an already-resolved [UserID] (or `None` for
//! an unauthenticated request, which yields empty results).

#![warn(missing_docs)]

mod bills;
mod database_id;
mod db;
mod stores;
mod transaction;
mod user;

pub use bills::{
    BillFlags, BillSummary, BillsEngine, CycleBounds, DEFAULT_WINDOW_DAYS, RecurringBillGroup,
    TransactionWithStatus, compute_bill_flags, cycle_bounds_from_due_day, group_recurring_bills,
    next_monthly_due,
};
pub use database_id::DatabaseID;
pub use db::initialize as initialize_db;
pub use stores::{BillTransactionStore, SQLiteTransactionStore};
pub use transaction::{Category, NewTransaction, Transaction, parse_iso_date};
pub use user::UserID;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date string could not be parsed as an ISO-8601 date.
    ///
    /// This is a fatal input-validation error: a transaction with an
    /// unparseable date would silently corrupt averages and cycle math if it
    /// were dropped, so the whole computation fails instead.
    #[error("could not parse \"{0}\" as an ISO-8601 date: {1}")]
    InvalidDate(String, String),

    /// A category slug read from the store did not match a known category.
    #[error("\"{0}\" is not a recognised transaction category")]
    InvalidCategory(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        Error::SqlError(error)
    }
}

//! Data-access seams for the bills engine.
//!
//! The engine only ever reads through [BillTransactionStore]; swapping the
//! SQLite implementation for anything else (or a test double) requires no
//! changes to the engine itself.

mod sqlite;
mod transaction;

pub use sqlite::SQLiteTransactionStore;
pub use transaction::BillTransactionStore;

//! Database schema setup for the transaction store.

use rusqlite::Connection;

/// Create the tables and indexes the application needs.
///
/// Dates are stored as ISO-8601 text, which sorts chronologically under
/// SQLite's default text collation.
///
/// # Errors
/// Returns an error if a table or index cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                recurring INTEGER NOT NULL DEFAULT 0,
                avatar TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS transactions_user_date_idx
             ON \"transaction\" (user_id, date)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS transactions_user_category_idx
             ON \"transaction\" (user_id, category)",
        (),
    )?;

    Ok(())
}

//! Table creation and bulk reset.
//!
//! # Invariants
//! - `ensure_schema` only issues `CREATE ... IF NOT EXISTS` statements.
//! - `phone.client_id` cascades on client delete, so `clear_all` empties both tables.

use crate::db::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables owned by this crate, in dependency order.
pub const TABLES: &[&str] = &["client", "phone"];

/// Creates the `client` and `phone` tables when absent.
///
/// Runs in a single transaction; a failure leaves no partially created table
/// behind from this call.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;
    Ok(())
}

/// Deletes every client row (and, via cascade, every phone row).
///
/// Returns the number of deleted clients.
pub fn clear_all(conn: &Connection) -> DbResult<usize> {
    let tx = conn.unchecked_transaction()?;
    let deleted = tx.execute("DELETE FROM client;", [])?;
    tx.commit()?;
    Ok(deleted)
}

/// Returns whether `table` exists in the main schema.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

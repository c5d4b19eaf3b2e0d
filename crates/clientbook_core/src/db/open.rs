//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure the session pragmas the repository relies on.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` (cascading phone deletes).
//! - Returned connections have `case_sensitive_like=ON` (client search).
//! - The statement cache can hold every named repository statement.

use super::DbResult;
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file with default session settings.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let config = StoreConfig::file(path.as_ref());
    open_with_config(&config)
}

/// Opens a private in-memory SQLite database with default session settings.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with_config(&StoreConfig::default())
}

/// Opens the database described by `config`.
///
/// `config.db_path = None` selects an in-memory database.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_with_config(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = if config.db_path.is_some() {
        "file"
    } else {
        "memory"
    };
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match config.db_path.as_deref() {
        Some(path) => Connection::open(path),
        None => Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn, config) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    configure_session(conn, config.effective_statement_cache_capacity())
}

/// Applies the pragmas and statement cache size the repository depends on.
///
/// Idempotent; also used for connections opened outside this module.
pub(crate) fn configure_session(
    conn: &Connection,
    statement_cache_capacity: usize,
) -> DbResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA case_sensitive_like = ON;",
    )?;
    conn.set_prepared_statement_cache_capacity(statement_cache_capacity);
    Ok(())
}

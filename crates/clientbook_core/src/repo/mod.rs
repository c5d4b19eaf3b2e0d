//! Repository layer for client and phone persistence.
//!
//! # Responsibility
//! - Define the data access contract used by callers.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Absent rows are reported as `None` / empty results, not errors.
//! - Store failures are surfaced unchanged in meaning; nothing is retried.

pub mod client_repo;

//! Domain records for clients and their phone numbers.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - A phone refers to its owner by `ClientId` only; there is no in-memory
//!   back-reference graph.

pub mod client;
pub mod phone;

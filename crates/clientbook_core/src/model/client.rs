//! Client domain record.

use serde::{Deserialize, Serialize};

/// Store-assigned client identifier.
pub type ClientId = i64;

/// A person record with name and optional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: ClientId,
    pub first_name: String,
    pub last_name: String,
    /// `None` when the client has no email on record.
    pub email: Option<String>,
}

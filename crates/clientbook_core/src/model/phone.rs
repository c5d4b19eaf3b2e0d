//! Phone domain record.

use crate::model::client::ClientId;
use serde::{Deserialize, Serialize};

/// Store-assigned phone identifier.
pub type PhoneId = i64;

/// A phone number owned by exactly one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub phone_id: PhoneId,
    /// Owning client. Referential integrity is enforced by the store.
    pub client_id: ClientId,
    pub phone_number: String,
}

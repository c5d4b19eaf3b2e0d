//! Core data access for clientbook.
//! Clients, their phone numbers, and substring search over both.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{ConfigError, StoreConfig};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientId};
pub use model::phone::{Phone, PhoneId};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};

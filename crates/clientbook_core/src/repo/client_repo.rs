//! Client/phone repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `client` and `phone` storage.
//! - Provide substring search across client fields and owned phone numbers.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Lookups of missing rows return `None` / empty `Vec`, never an error.
//! - Update/remove of a missing id is a no-op.
//! - Each write runs in its own transaction, committed before returning.
//! - `get_phones` is ordered by ascending `phone_id`.
//! - Every statement goes through the connection's prepared statement cache.

use crate::config::StoreConfig;
use crate::db::{configure_session, open_with_config, schema, DbError};
use crate::model::client::{Client, ClientId};
use crate::model::phone::{Phone, PhoneId};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const INSERT_CLIENT_SQL: &str = "INSERT INTO client (first_name, last_name, email)
VALUES (?1, ?2, ?3);";

const SELECT_CLIENT_SQL: &str = "SELECT client_id, first_name, last_name, email
FROM client
WHERE client_id = ?1;";

const UPDATE_CLIENT_SQL: &str = "UPDATE client
SET first_name = ?2, last_name = ?3, email = ?4
WHERE client_id = ?1;";

const DELETE_CLIENT_SQL: &str = "DELETE FROM client WHERE client_id = ?1;";

const INSERT_PHONE_SQL: &str = "INSERT INTO phone (client_id, phone_number)
VALUES (?1, ?2);";

const SELECT_PHONE_SQL: &str = "SELECT phone_id, client_id, phone_number
FROM phone
WHERE phone_id = ?1;";

const SELECT_PHONES_SQL: &str = "SELECT phone_id, client_id, phone_number
FROM phone
WHERE client_id = ?1
ORDER BY phone_id ASC;";

const DELETE_PHONE_SQL: &str = "DELETE FROM phone WHERE phone_id = ?1;";

const SEARCH_CLIENTS_SQL: &str = "SELECT DISTINCT
    c.client_id AS client_id,
    c.first_name AS first_name,
    c.last_name AS last_name,
    c.email AS email
FROM client c
LEFT JOIN phone p ON p.client_id = c.client_id
WHERE c.first_name LIKE '%' || ?1 || '%'
   OR c.last_name LIKE '%' || ?1 || '%'
   OR c.email LIKE '%' || ?1 || '%'
   OR p.phone_number LIKE '%' || ?1 || '%'
ORDER BY c.client_id ASC;";

const STATEMENTS: &[&str] = &[
    INSERT_CLIENT_SQL,
    SELECT_CLIENT_SQL,
    UPDATE_CLIENT_SQL,
    DELETE_CLIENT_SQL,
    INSERT_PHONE_SQL,
    SELECT_PHONE_SQL,
    SELECT_PHONES_SQL,
    DELETE_PHONE_SQL,
    SEARCH_CLIENTS_SQL,
];

/// Number of distinct statements kept in the connection's statement cache.
pub(crate) const STATEMENT_COUNT: usize = STATEMENTS.len();

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client/phone persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A phone was written for a client id the store does not know.
    ReferentialIntegrity {
        client_id: ClientId,
        source: DbError,
    },
}

impl RepoError {
    /// Returns true for foreign-key rejections on phone inserts.
    pub fn is_referential_integrity(&self) -> bool {
        matches!(self, Self::ReferentialIntegrity { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ReferentialIntegrity { client_id, source } => {
                write!(f, "client {client_id} does not exist: {source}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ReferentialIntegrity { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for clients and their phones.
pub trait ClientRepository {
    /// Creates the `client` and `phone` tables if absent.
    fn ensure_schema(&self) -> RepoResult<()>;
    /// Deletes every client and, by cascade, every phone.
    fn clear(&self) -> RepoResult<()>;
    fn add_client(
        &self,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
    ) -> RepoResult<ClientId>;
    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>>;
    /// Replaces every mutable field; `email = None` clears a stored email.
    fn update_client(
        &self,
        id: ClientId,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
    ) -> RepoResult<()>;
    fn remove_client(&self, id: ClientId) -> RepoResult<()>;
    fn add_phone(&self, client_id: ClientId, phone_number: &str) -> RepoResult<PhoneId>;
    fn get_phone(&self, id: PhoneId) -> RepoResult<Option<Phone>>;
    /// Phones owned by `client_id`, ascending by `phone_id`.
    fn get_phones(&self, client_id: ClientId) -> RepoResult<Vec<Phone>>;
    fn remove_phone(&self, id: PhoneId) -> RepoResult<()>;
    /// Clients whose name, email or any phone number contains `term`.
    fn search_clients(&self, term: &str) -> RepoResult<Vec<Client>>;
}

/// SQLite-backed client repository owning a single connection.
pub struct SqliteClientRepository {
    conn: Connection,
}

impl SqliteClientRepository {
    /// Opens the store described by `config`.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        let conn = open_with_config(config)?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::open(&StoreConfig::default())
    }

    /// Adopts an existing connection, enabling foreign keys and
    /// case-sensitive `LIKE` on it.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        configure_session(
            &conn,
            StoreConfig::default().effective_statement_cache_capacity(),
        )?;
        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases the repository and returns its connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Prepares every repository statement up front.
    ///
    /// Statements are otherwise prepared lazily on first use. Requires the
    /// schema to exist.
    pub fn prepare_statements(&self) -> RepoResult<()> {
        for sql in STATEMENTS {
            self.conn.prepare_cached(sql)?;
        }
        debug!(
            "event=prepare_statements module=repo status=ok count={}",
            STATEMENT_COUNT
        );
        Ok(())
    }

    fn execute_write<P: Params>(&self, sql: &str, params: P) -> rusqlite::Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = {
            let mut stmt = tx.prepare_cached(sql)?;
            stmt.execute(params)?
        };
        tx.commit()?;
        Ok(changed)
    }

    fn query_all<T, P, F>(&self, sql: &str, params: P, map: F) -> rusqlite::Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params, map)?;
        rows.collect()
    }

    fn insert_row<P: Params>(&self, sql: &str, params: P) -> rusqlite::Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            stmt.execute(params)?;
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }
}

impl ClientRepository for SqliteClientRepository {
    fn ensure_schema(&self) -> RepoResult<()> {
        let result = schema::ensure_schema(&self.conn).map_err(RepoError::from);
        log_outcome("ensure_schema", result)?;
        debug!("event=ensure_schema module=repo status=ok");
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        let deleted = log_outcome("clear", schema::clear_all(&self.conn).map_err(Into::into))?;
        debug!("event=clear module=repo status=ok deleted_clients={deleted}");
        Ok(())
    }

    fn add_client(
        &self,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
    ) -> RepoResult<ClientId> {
        let result = self
            .insert_row(INSERT_CLIENT_SQL, params![first_name, last_name, email])
            .map_err(RepoError::from);
        let id = log_outcome("add_client", result)?;
        debug!(
            "event=add_client module=repo status=ok client_id={id} has_email={}",
            email.is_some()
        );
        Ok(id)
    }

    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let result = self
            .conn
            .prepare_cached(SELECT_CLIENT_SQL)
            .and_then(|mut stmt| stmt.query_row([id], client_from_row).optional())
            .map_err(RepoError::from);
        log_outcome("get_client", result)
    }

    fn update_client(
        &self,
        id: ClientId,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
    ) -> RepoResult<()> {
        let result = self
            .execute_write(UPDATE_CLIENT_SQL, params![id, first_name, last_name, email])
            .map_err(RepoError::from);
        let changed = log_outcome("update_client", result)?;
        debug!("event=update_client module=repo status=ok client_id={id} changed={changed}");
        Ok(())
    }

    fn remove_client(&self, id: ClientId) -> RepoResult<()> {
        let result = self
            .execute_write(DELETE_CLIENT_SQL, [id])
            .map_err(RepoError::from);
        let changed = log_outcome("remove_client", result)?;
        debug!("event=remove_client module=repo status=ok client_id={id} changed={changed}");
        Ok(())
    }

    fn add_phone(&self, client_id: ClientId, phone_number: &str) -> RepoResult<PhoneId> {
        let result = self
            .insert_row(INSERT_PHONE_SQL, params![client_id, phone_number])
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::ReferentialIntegrity {
                        client_id,
                        source: DbError::Sqlite(err),
                    }
                } else {
                    RepoError::from(err)
                }
            });
        let id = log_outcome("add_phone", result)?;
        debug!("event=add_phone module=repo status=ok client_id={client_id} phone_id={id}");
        Ok(id)
    }

    fn get_phone(&self, id: PhoneId) -> RepoResult<Option<Phone>> {
        let result = self
            .conn
            .prepare_cached(SELECT_PHONE_SQL)
            .and_then(|mut stmt| stmt.query_row([id], phone_from_row).optional())
            .map_err(RepoError::from);
        log_outcome("get_phone", result)
    }

    fn get_phones(&self, client_id: ClientId) -> RepoResult<Vec<Phone>> {
        let result = self
            .query_all(SELECT_PHONES_SQL, [client_id], phone_from_row)
            .map_err(RepoError::from);
        log_outcome("get_phones", result)
    }

    fn remove_phone(&self, id: PhoneId) -> RepoResult<()> {
        let result = self
            .execute_write(DELETE_PHONE_SQL, [id])
            .map_err(RepoError::from);
        let changed = log_outcome("remove_phone", result)?;
        debug!("event=remove_phone module=repo status=ok phone_id={id} changed={changed}");
        Ok(())
    }

    fn search_clients(&self, term: &str) -> RepoResult<Vec<Client>> {
        let result = self
            .query_all(SEARCH_CLIENTS_SQL, [term], client_from_row)
            .map_err(RepoError::from);
        let clients = log_outcome("search_clients", result)?;
        // Search terms are user data; only their size is logged.
        debug!(
            "event=search_clients module=repo status=ok term_chars={} hits={}",
            term.chars().count(),
            clients.len()
        );
        Ok(clients)
    }
}

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        client_id: row.get("client_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    })
}

fn phone_from_row(row: &Row<'_>) -> rusqlite::Result<Phone> {
    Ok(Phone {
        phone_id: row.get("phone_id")?,
        client_id: row.get("client_id")?,
        phone_number: row.get("phone_number")?,
    })
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

fn log_outcome<T>(event: &'static str, result: RepoResult<T>) -> RepoResult<T> {
    if let Err(err) = &result {
        warn!("event={event} module=repo status=error error={err}");
    }
    result
}

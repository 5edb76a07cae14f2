//! Note persistence and query boundary.
//!
//! # Responsibility
//! - Define the store contract (`NoteStore`) and its SQLite implementation.
//! - Resolve addresses, projections, and filters at the boundary.
//! - Fan out change notifications after every mutation.
//!
//! # Invariants
//! - Projection names are resolved through a fixed allow-list; unknown names
//!   are rejected, never silently dropped.
//! - Every mutation notifies the mutated address after it is durably applied.
//! - The store holds no per-caller session state.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod changes;
pub mod note_store;
pub mod projection;
pub mod selector;

pub use changes::{ChangeEvent, ChangeHub, ChangeSubscription};
pub use note_store::{NoteStore, ProjectedNote, QueryRequest, QueryRows, SqliteNoteStore};
pub use selector::Selector;

pub type StoreResult<T> = Result<T, StoreError>;

/// Boundary error for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Address does not match a recognized shape, or the shape is not a
    /// valid target for the attempted operation.
    InvalidAddress(String),
    /// Requested projection name is not in the column allow-list.
    UnknownColumn(String),
    /// Underlying storage write did not complete; no partial state remains.
    WriteFailure(DbError),
    /// Read-path database failure, including malformed filter arguments
    /// surfaced by the query executor.
    Db(DbError),
    /// Persisted row holds a value the model cannot represent.
    InvalidData(String),
    /// Connection has not been migrated to the schema this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(details) => write!(f, "invalid address: {details}"),
            Self::UnknownColumn(name) => {
                write!(f, "unknown projection column `{name}`")
            }
            Self::WriteFailure(err) => write!(f, "write failed: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(details) => write!(f, "invalid persisted note data: {details}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriteFailure(err) | Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl StoreError {
    /// Wraps a write-path SQLite failure.
    pub(crate) fn write(err: rusqlite::Error) -> Self {
        Self::WriteFailure(DbError::Sqlite(err))
    }
}

//! Repository layer: errors, filter containers and per-entity stores.
//!
//! # Responsibility
//! - Define the shared repository error taxonomy.
//! - Provide the ordered column/value containers used by every query.
//!
//! # Invariants
//! - Column names in filters and value sets are validated against the
//!   target table before any SQL string is assembled.
//! - Unique-constraint violations surface as `RepoError::Conflict`.

use crate::db::DbError;
use crate::model::student::StudentValidationError;
use rusqlite::types::Value;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod institute_repo;
pub mod major_repo;
pub mod records;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error taxonomy shared by every entity store.
#[derive(Debug)]
pub enum RepoError {
    /// No record matched where one was required.
    NotFound(String),
    /// Caller mistake: malformed delete, duplicate explicit id, empty
    /// patch, or a multi-row match on a single-record operation.
    BadRequest(String),
    /// Constraint violation on a write (duplicate unique key, broken
    /// foreign reference).
    Conflict(String),
    /// A filter or value named a column the target table does not have.
    UnknownColumn {
        table: &'static str,
        column: String,
    },
    Validation(StudentValidationError),
    Db(DbError),
    /// Persisted state failed decoding; never masked as an empty result.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::UnknownColumn { table, column } => {
                write!(f, "unknown column `{column}` for table `{table}`")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(message.unwrap_or_else(|| "constraint violation".to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Ordered exact-equality filter conjunction.
///
/// An empty set matches every row; `delete` additionally requires the
/// explicit `delete_all` flag before acting on an empty set.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    entries: Vec<(String, Value)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `column = value` predicate.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(column, _)| column.as_str())
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}

/// Ordered column/value assignments for insert and update statements.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    entries: Vec<(String, Value)>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one column assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(column, _)| column.as_str())
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}

//! Relational store: per-table repository contracts and SQLite
//! implementations.
//!
//! # Responsibility
//! - Provide CRUD over `students`, `instructors`, `courses` and
//!   `enrollments`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate fields before any SQL runs.
//! - Multi-statement writes run in one transaction; a failure leaves the
//!   last committed state untouched.
//! - List queries have a total, deterministic order.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::person::ValidationError;
use crate::model::EntityKind;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course_repo;
pub mod instructor_repo;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for store reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { kind: EntityKind, id: String },
    /// Stored rows that no longer pass entity validation.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
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
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn not_found(kind: EntityKind, id: &str) -> RepoError {
    RepoError::NotFound {
        kind,
        id: id.to_string(),
    }
}

pub(crate) fn entity_exists(conn: &Connection, kind: EntityKind, id: &str) -> RepoResult<bool> {
    let sql = match kind {
        EntityKind::Student => "SELECT EXISTS(SELECT 1 FROM students WHERE sid = ?1);",
        EntityKind::Instructor => "SELECT EXISTS(SELECT 1 FROM instructors WHERE iid = ?1);",
        EntityKind::Course => "SELECT EXISTS(SELECT 1 FROM courses WHERE cid = ?1);",
    };
    let exists: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

pub(crate) fn ensure_exists(conn: &Connection, kind: EntityKind, id: &str) -> RepoResult<()> {
    if entity_exists(conn, kind, id)? {
        Ok(())
    } else {
        Err(not_found(kind, id))
    }
}

pub(crate) fn ensure_absent(conn: &Connection, kind: EntityKind, id: &str) -> RepoResult<()> {
    if entity_exists(conn, kind, id)? {
        return Err(RepoError::Validation(ValidationError::DuplicateId {
            kind,
            id: id.to_string(),
        }));
    }
    Ok(())
}

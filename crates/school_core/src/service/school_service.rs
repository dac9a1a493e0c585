//! School context object and use cases.
//!
//! # Responsibility
//! - Own the store connection, configuration and the loaded graph.
//! - Route every mutation through the store, then reload the graph.
//! - Expose snapshot export/import, backup and search.
//!
//! # Invariants
//! - After any successful mutation, `graph()` reflects the committed store.
//! - A failed mutation leaves both the store and `graph()` unchanged.
//! - `import_snapshot` replaces the store in one transaction.

use crate::config::CoreConfig;
use crate::db::{backup_to, backup_to_dir, open_db, open_db_in_memory, DbError};
use crate::model::graph::SchoolGraph;
use crate::model::person::ValidationError;
use crate::model::EntityKind;
use crate::reconcile::store_sync::{load_graph, overwrite_store};
use crate::repo::course_repo::{
    CourseRef, CourseRepository, CourseRow, CourseSummary, RosterEntry, SqliteCourseRepository,
};
use crate::repo::instructor_repo::{
    InstructorRepository, InstructorRow, SqliteInstructorRepository,
};
use crate::repo::student_repo::{SqliteStudentRepository, StudentRepository, StudentRow};
use crate::repo::{RepoError, RepoResult};
use crate::search::filter::{search, SearchHits};
use crate::snapshot::{read_snapshot, write_snapshot, SnapshotError};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error for context-level use cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound { kind: EntityKind, id: String },
    Repo(RepoError),
    Db(DbError),
    Snapshot(SnapshotError),
    /// `backup(None)` on a context without a backup directory.
    NoBackupDestination,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::NoBackupDestination => {
                write!(f, "no backup destination given and no backup directory configured")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::NotFound { .. } | Self::NoBackupDestination => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<SnapshotError> for ServiceError {
    fn from(value: SnapshotError) -> Self {
        match value {
            SnapshotError::Validation(err) => Self::Validation(err),
            other => Self::Snapshot(other),
        }
    }
}

/// One open school store plus its loaded graph.
pub struct SchoolService {
    conn: Connection,
    config: Option<CoreConfig>,
    graph: SchoolGraph,
}

impl SchoolService {
    /// Opens the database at `config.db_path` and loads the graph.
    pub fn open(config: CoreConfig) -> ServiceResult<Self> {
        let conn = open_db(&config.db_path)?;
        Self::from_connection(conn, Some(config))
    }

    /// Private in-memory store with no backup directory.
    pub fn open_in_memory() -> ServiceResult<Self> {
        Self::from_connection(open_db_in_memory()?, None)
    }

    fn from_connection(conn: Connection, config: Option<CoreConfig>) -> ServiceResult<Self> {
        let graph = load_graph(&conn)?;
        Ok(Self {
            conn,
            config,
            graph,
        })
    }

    pub fn graph(&self) -> &SchoolGraph {
        &self.graph
    }

    pub fn config(&self) -> Option<&CoreConfig> {
        self.config.as_ref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Rebuilds the graph from the store.
    pub fn reload(&mut self) -> ServiceResult<&SchoolGraph> {
        self.graph = load_graph(&self.conn)?;
        Ok(&self.graph)
    }

    pub fn add_student(&mut self, row: &StudentRow) -> ServiceResult<()> {
        self.write("add_student", &row.sid, |conn| {
            SqliteStudentRepository::new(conn).add_student(row)
        })
    }

    pub fn update_student(&mut self, row: &StudentRow) -> ServiceResult<()> {
        self.write("update_student", &row.sid, |conn| {
            SqliteStudentRepository::new(conn).update_student(row)
        })
    }

    /// Deletes the student and its enrollments.
    pub fn delete_student(&mut self, sid: &str) -> ServiceResult<()> {
        self.write("delete_student", sid, |conn| {
            SqliteStudentRepository::new(conn).delete_student(sid)
        })
    }

    pub fn add_instructor(&mut self, row: &InstructorRow) -> ServiceResult<()> {
        self.write("add_instructor", &row.iid, |conn| {
            SqliteInstructorRepository::new(conn).add_instructor(row)
        })
    }

    pub fn update_instructor(&mut self, row: &InstructorRow) -> ServiceResult<()> {
        self.write("update_instructor", &row.iid, |conn| {
            SqliteInstructorRepository::new(conn).update_instructor(row)
        })
    }

    /// Deletes the instructor; its courses stay with no instructor.
    pub fn delete_instructor(&mut self, iid: &str) -> ServiceResult<()> {
        self.write("delete_instructor", iid, |conn| {
            SqliteInstructorRepository::new(conn).delete_instructor(iid)
        })
    }

    pub fn add_course(&mut self, row: &CourseRow) -> ServiceResult<()> {
        self.write("add_course", &row.cid, |conn| {
            SqliteCourseRepository::new(conn).add_course(row)
        })
    }

    pub fn update_course_name(&mut self, cid: &str, name: &str) -> ServiceResult<()> {
        self.write("update_course_name", cid, |conn| {
            SqliteCourseRepository::new(conn).update_course_name(cid, name)
        })
    }

    /// Deletes the course and its enrollments.
    pub fn delete_course(&mut self, cid: &str) -> ServiceResult<()> {
        self.write("delete_course", cid, |conn| {
            SqliteCourseRepository::new(conn).delete_course(cid)
        })
    }

    /// Enrolls `sid` in `cid`. Returns `false` when already enrolled.
    pub fn register(&mut self, sid: &str, cid: &str) -> ServiceResult<bool> {
        self.write("register", &format!("{sid}:{cid}"), |conn| {
            SqliteCourseRepository::new(conn).register_student(sid, cid)
        })
    }

    /// Returns `false` when there was no such enrollment.
    pub fn unregister(&mut self, sid: &str, cid: &str) -> ServiceResult<bool> {
        self.write("unregister", &format!("{sid}:{cid}"), |conn| {
            SqliteCourseRepository::new(conn).unregister_student(sid, cid)
        })
    }

    pub fn assign_instructor(&mut self, cid: &str, iid: &str) -> ServiceResult<()> {
        self.write("assign_instructor", &format!("{cid}:{iid}"), |conn| {
            SqliteCourseRepository::new(conn).set_course_instructor(cid, iid)
        })
    }

    pub fn clear_instructor(&mut self, cid: &str) -> ServiceResult<()> {
        self.write("clear_instructor", cid, |conn| {
            SqliteCourseRepository::new(conn).clear_course_instructor(cid)
        })
    }

    pub fn list_students(&self) -> ServiceResult<Vec<StudentRow>> {
        Ok(SqliteStudentRepository::new(&self.conn).list_students()?)
    }

    pub fn list_instructors(&self) -> ServiceResult<Vec<InstructorRow>> {
        Ok(SqliteInstructorRepository::new(&self.conn).list_instructors()?)
    }

    pub fn list_courses(&self) -> ServiceResult<Vec<CourseSummary>> {
        Ok(SqliteCourseRepository::new(&self.conn).list_courses()?)
    }

    pub fn course_roster(&self, cid: &str) -> ServiceResult<Vec<RosterEntry>> {
        Ok(SqliteCourseRepository::new(&self.conn).list_course_roster(cid)?)
    }

    pub fn student_courses(&self, sid: &str) -> ServiceResult<Vec<CourseRef>> {
        Ok(SqliteStudentRepository::new(&self.conn).list_student_courses(sid)?)
    }

    /// Writes the loaded graph as a JSON snapshot.
    pub fn export_snapshot(&self, path: impl AsRef<Path>) -> ServiceResult<()> {
        write_snapshot(path, &self.graph)?;
        Ok(())
    }

    /// Replaces the whole store with a snapshot file, then reloads.
    ///
    /// The file is parsed and reconciled before the store is touched, so a
    /// malformed snapshot leaves the store as it was.
    pub fn import_snapshot(&mut self, path: impl AsRef<Path>) -> ServiceResult<()> {
        let graph = read_snapshot(path)?;
        overwrite_store(&self.conn, &graph)?;
        self.reload()?;
        Ok(())
    }

    /// Copies the store to `dest`, or to a timestamped file in the configured
    /// backup directory when `dest` is `None`. Returns the written path.
    pub fn backup(&self, dest: Option<&Path>) -> ServiceResult<PathBuf> {
        match dest {
            Some(dest) => {
                backup_to(&self.conn, dest)?;
                Ok(dest.to_path_buf())
            }
            None => {
                let dir = self
                    .config
                    .as_ref()
                    .map(|config| config.backup_dir.as_path())
                    .ok_or(ServiceError::NoBackupDestination)?;
                Ok(backup_to_dir(&self.conn, dir)?)
            }
        }
    }

    /// Filters the loaded graph by free text.
    pub fn search(&self, text: &str) -> SearchHits<'_> {
        search(&self.graph, text)
    }

    fn write<T>(
        &mut self,
        op: &'static str,
        target: &str,
        apply: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        let value = match apply(&self.conn) {
            Ok(value) => {
                info!("event=store_write module=service status=ok op={op} target={target}");
                value
            }
            Err(err) => {
                warn!(
                    "event=store_write module=service status=error op={op} target={target} error={err}"
                );
                return Err(err.into());
            }
        };
        self.reload()?;
        Ok(value)
    }
}

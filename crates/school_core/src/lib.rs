//! Core domain logic for the school manager.
//! This crate is the single source of truth for the entity invariants and
//! for moving the entity graph between memory, SQLite and JSON snapshots.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod repo;
pub mod search;
pub mod service;
pub mod snapshot;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::course::Course;
pub use model::graph::{GraphError, SchoolGraph, SymmetryViolation};
pub use model::instructor::Instructor;
pub use model::person::{Person, PersonLike, ValidationError};
pub use model::student::Student;
pub use model::EntityKind;
pub use reconcile::store_sync::{load_graph, overwrite_store};
pub use reconcile::{reconcile, reconcile_with_report, ReconcileReport};
pub use repo::course_repo::{CourseRow, CourseSummary, EnrollmentRow, RosterEntry};
pub use repo::instructor_repo::InstructorRow;
pub use repo::student_repo::StudentRow;
pub use repo::{RepoError, RepoResult};
pub use search::filter::SearchHits;
pub use service::school_service::{SchoolService, ServiceError, ServiceResult};
pub use snapshot::document::SnapshotDocument;
pub use snapshot::SnapshotError;

/// Minimal health-check API for front ends.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

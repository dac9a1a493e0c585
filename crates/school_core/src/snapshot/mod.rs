//! JSON snapshot codec for backup and restore.
//!
//! # Responsibility
//! - Flatten a [`SchoolGraph`] into ID-referencing documents.
//! - Parse and write the JSON file form.
//! - Rebuild graphs through the reconciler.
//!
//! # Invariants
//! - `decode(&encode(graph))` has the same IDs, scalar fields and edges as
//!   `graph`.
//! - Files are written with 4-space pretty indentation.

pub mod document;

use crate::model::graph::SchoolGraph;
use crate::model::person::ValidationError;
use crate::reconcile::reconcile;
use document::SnapshotDocument;
use log::{error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Error for snapshot encoding, decoding and file I/O.
#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(ValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot io error: {err}"),
            Self::Json(err) => write!(f, "snapshot json error: {err}"),
            Self::Validation(err) => write!(f, "snapshot record rejected: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ValidationError> for SnapshotError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Flattens the graph, keeping collection order.
pub fn encode(graph: &SchoolGraph) -> SnapshotDocument {
    SnapshotDocument {
        students: graph.students().iter().map(|s| s.to_document()).collect(),
        instructors: graph
            .instructors()
            .iter()
            .map(|i| i.to_document())
            .collect(),
        courses: graph.courses().iter().map(|c| c.to_document()).collect(),
    }
}

/// Rebuilds a symmetric graph; dangling IDs are dropped.
pub fn decode(doc: &SnapshotDocument) -> SnapshotResult<SchoolGraph> {
    Ok(reconcile(doc)?)
}

pub fn to_json_string(doc: &SnapshotDocument) -> SnapshotResult<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut serializer)?;
    String::from_utf8(buf)
        .map_err(|err| SnapshotError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

pub fn from_json_str(text: &str) -> SnapshotResult<SnapshotDocument> {
    Ok(serde_json::from_str(text)?)
}

/// Writes `graph` as a JSON snapshot, creating parent directories.
pub fn write_snapshot(path: impl AsRef<Path>, graph: &SchoolGraph) -> SnapshotResult<()> {
    let path = path.as_ref();
    let result = encode_to_file(path, graph);
    match &result {
        Ok(()) => info!(
            "event=snapshot_write module=snapshot status=ok students={} instructors={} courses={}",
            graph.students().len(),
            graph.instructors().len(),
            graph.courses().len()
        ),
        Err(err) => error!("event=snapshot_write module=snapshot status=error error={err}"),
    }
    result
}

/// Reads and reconciles a JSON snapshot.
pub fn read_snapshot(path: impl AsRef<Path>) -> SnapshotResult<SchoolGraph> {
    let result = std::fs::read_to_string(path.as_ref())
        .map_err(SnapshotError::from)
        .and_then(|text| from_json_str(&text))
        .and_then(|doc| decode(&doc));
    match &result {
        Ok(graph) => info!(
            "event=snapshot_read module=snapshot status=ok students={} instructors={} courses={}",
            graph.students().len(),
            graph.instructors().len(),
            graph.courses().len()
        ),
        Err(err) => error!("event=snapshot_read module=snapshot status=error error={err}"),
    }
    result
}

fn encode_to_file(path: &Path, graph: &SchoolGraph) -> SnapshotResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let text = to_json_string(&encode(graph))?;
    std::fs::write(path, text)?;
    Ok(())
}

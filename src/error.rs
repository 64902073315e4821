use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds of the QC pipeline that callers may want to tell apart.
/// Everything else travels as a plain `anyhow::Error` with context.
#[derive(Error, Debug)]
pub enum QcError {
    #[error("no input scans: {0}")]
    NoInputScans(String),

    #[error("no anatomical brain mask found for sub-{subject}")]
    MissingAnatomicalMask { subject: String },

    #[error("{count} anatomical brain masks found for sub-{subject}, expected exactly one")]
    AmbiguousAnatomicalMask { subject: String, count: usize },

    #[error("scan {identifier} references sub-{subject}, which has no anatomical metrics")]
    UnknownSubject { identifier: String, subject: String },

    #[error("geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("identifier {identifier} has entities [{found}], expected [{expected}]")]
    IdentifierMismatch {
        identifier: String,
        expected: String,
        found: String,
    },

    #[error("invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("column '{column}' not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("template file not found: {0}")]
    TemplateNotFound(String),

    #[error("{count} template files match {query}")]
    AmbiguousTemplate { query: String, count: usize },
}

use std::path::PathBuf;

/// Errors surfaced by the replace pipeline and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    #[error("Document not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// Offsets handed to the resolver or splice engine do not fit the segment list.
    /// This is a caller bug, never a recoverable condition.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Segment path no longer resolves: {0}")]
    PathNotFound(String),

    #[error("Container error: {0}")]
    Container(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReplaceError>;

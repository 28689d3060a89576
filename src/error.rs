//! Structured error taxonomy (spec §7). Library code returns these so callers
//! can match on failure kind; the CLI binds them into `anyhow::Error` context.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UgitError {
    #[error("not a ugit repository (no .ugit found above {0})")]
    NotARepository(PathBuf),

    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown object: {0}")]
    UnknownObject(String),

    #[error("corrupt object {hash}: {reason}")]
    Corrupt { hash: String, reason: String },

    #[error("commit message is empty")]
    EmptyMessage,

    #[error("expected {expected} object, found {found}")]
    BadKind { expected: &'static str, found: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UgitError>;

//! The few genuinely fatal conditions. Everything else is locally
//! recoverable — oracle misses, missing package info, symbol
//! well-formedness violations — and is handled inline by the walker,
//! never surfacing as an `Err`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("project root is not readable: {0}")]
    UnreadableProjectRoot(PathBuf),

    #[error("no Python files found under {0}")]
    NoPythonFiles(PathBuf),

    #[error("failed to write to the document sink: {0}")]
    SinkWriteFailed(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;

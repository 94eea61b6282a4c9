//! Error taxonomy for a decryptor run. Every variant is fatal: nothing is
//! retried locally and no partial output is ever written.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single marker resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("bearer credential unavailable at {}: {reason}", path.display())]
    CredentialUnavailable { path: PathBuf, reason: String },
    #[error("transport failure talking to resolver: {0}")]
    Transport(String),
    #[error("resolver rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Failure of a whole decryptor run.
#[derive(Debug, Error)]
pub enum DecryptorError {
    #[error("source file {} unreadable: {reason}", path.display())]
    InputRead { path: PathBuf, reason: String },
    #[error("source file {} is not valid JSON: {reason}", path.display())]
    InputParse { path: PathBuf, reason: String },
    #[error("resolution of value at '{pointer}' failed: {source}")]
    Resolution {
        pointer: String,
        #[source]
        source: ResolveError,
    },
    #[error("output serialization failed: {0}")]
    OutputSerialize(String),
    #[error("target file {} not writable: {reason}", path.display())]
    OutputWrite { path: PathBuf, reason: String },
}

impl DecryptorError {
    /// The resolver failure behind this error, if the run aborted mid-walk.
    pub fn resolve_error(&self) -> Option<&ResolveError> {
        match self {
            DecryptorError::Resolution { source, .. } => Some(source),
            _ => None,
        }
    }
}

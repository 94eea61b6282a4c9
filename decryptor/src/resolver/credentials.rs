//! Bearer credential supply. The resolver asks for a credential before every
//! request; nothing is cached between calls.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::ResolveError;

/// Default location of the mounted service account token.
pub const DEFAULT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Something that can hand out a bearer credential on demand.
pub trait CredentialSource {
    fn credential(&self) -> Result<Zeroizing<String>, ResolveError>;
}

impl<F> CredentialSource for F
where
    F: Fn() -> Result<Zeroizing<String>, ResolveError>,
{
    fn credential(&self) -> Result<Zeroizing<String>, ResolveError> {
        self()
    }
}

/// Reads the credential from a file on every call.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> ResolveError {
        ResolveError::CredentialUnavailable {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl Default for TokenFile {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_PATH)
    }
}

impl CredentialSource for TokenFile {
    fn credential(&self) -> Result<Zeroizing<String>, ResolveError> {
        let content = Zeroizing::new(
            fs::read_to_string(&self.path).map_err(|e| self.unavailable(format!("{e}")))?,
        );
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(self.unavailable("token file is empty"));
        }
        Ok(Zeroizing::new(trimmed.to_string()))
    }
}

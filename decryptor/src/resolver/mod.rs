//! Resolution side of the pipeline: the capability the walker calls for each
//! marker, the credential supply it depends on, and the HTTP client that
//! implements it against the decrypt service.

pub mod credentials;
pub mod http;

use crate::error::ResolveError;

pub use credentials::{CredentialSource, TokenFile};
pub use http::HttpResolver;

/// Exchanges an opaque ciphertext token for its plaintext.
///
/// Implementations perform one blocking exchange per call and keep no state
/// between calls, so sibling resolutions never depend on each other.
pub trait Resolver {
    fn resolve(&self, token: &str) -> Result<String, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, token: &str) -> Result<String, ResolveError> {
        (**self).resolve(token)
    }
}

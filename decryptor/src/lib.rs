//! Resolves encrypted values in JSON documents. String leaves of the form
//! `secure:<token>` are exchanged for their plaintext through a remote decrypt
//! service; everything else in the document is left exactly as it was.

pub mod config;
pub mod document;
pub mod error;
pub mod resolver;
pub mod walker;

pub use document::decrypt_file;
pub use error::{DecryptorError, ResolveError};
pub use walker::{decrypt_value, walk, WalkSummary};

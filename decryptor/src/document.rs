//! Document I/O and the end-to-end run: read the source, resolve every marker,
//! and only then write the target. A failed run leaves the target untouched.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::DecryptorError;
use crate::resolver::Resolver;
use crate::walker::{walk, WalkSummary};

/// Reads and parses the JSON document at `path`.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value, DecryptorError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| DecryptorError::InputRead {
        path: path.to_path_buf(),
        reason: format!("{e}"),
    })?;
    serde_json::from_str(&raw).map_err(|e| DecryptorError::InputParse {
        path: path.to_path_buf(),
        reason: format!("{e}"),
    })
}

/// Serializes `document` as compact JSON, creating or truncating `path`.
pub fn write_document(path: impl AsRef<Path>, document: &Value) -> Result<(), DecryptorError> {
    let path = path.as_ref();
    let bytes =
        serde_json::to_vec(document).map_err(|e| DecryptorError::OutputSerialize(format!("{e}")))?;
    fs::write(path, bytes).map_err(|e| DecryptorError::OutputWrite {
        path: path.to_path_buf(),
        reason: format!("{e}"),
    })
}

/// Resolves `source` into `target` using `resolver`.
pub fn decrypt_file<R: Resolver>(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    resolver: &R,
) -> Result<WalkSummary, DecryptorError> {
    let (source, target) = (source.as_ref(), target.as_ref());
    info!(source = %source.display(), target = %target.display(), "decryptor starting");

    let mut document = load_document(source)?;
    let summary = walk(&mut document, resolver)?;
    write_document(target, &document)?;

    info!(resolved = summary.resolved, "decryptor run completed successfully");
    Ok(summary)
}

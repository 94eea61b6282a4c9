//! Structural walker over parsed JSON.
//!
//! The walk is depth-first and in place: containers are descended through
//! mutable iterators and only string leaves carrying the `secure:` marker are
//! rewritten. Keys are never touched, arrays keep their order and every other
//! scalar passes through as-is. The first failed resolution aborts the walk.

use serde_json::Value;
use tracing::debug;

use crate::error::DecryptorError;
use crate::resolver::Resolver;

/// Literal, case-sensitive prefix that marks a value as encrypted.
pub const MARKER_PREFIX: &str = "secure:";

/// Returns the ciphertext token when `value` is an encrypted marker.
///
/// The token is everything after the first colon, so it may itself contain
/// colons and may be empty.
pub fn marker_token(value: &str) -> Option<&str> {
    value.strip_prefix(MARKER_PREFIX)
}

/// Outcome of a successful walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub resolved: usize,
}

/// Resolves every marker inside `value`, rewriting it in place.
///
/// On error `value` may be partially rewritten and must be discarded.
pub fn walk<R: Resolver>(value: &mut Value, resolver: &R) -> Result<WalkSummary, DecryptorError> {
    let mut walker = Walker {
        resolver,
        pointer: String::new(),
        summary: WalkSummary::default(),
    };
    walker.visit(value)?;
    Ok(walker.summary)
}

/// Owned variant of [`walk`]: consumes the document and returns the resolved one.
pub fn decrypt_value<R: Resolver>(mut value: Value, resolver: &R) -> Result<Value, DecryptorError> {
    walk(&mut value, resolver)?;
    Ok(value)
}

struct Walker<'r, R> {
    resolver: &'r R,
    /// JSON Pointer of the value currently visited.
    pointer: String,
    summary: WalkSummary,
}

impl<R: Resolver> Walker<'_, R> {
    fn visit(&mut self, value: &mut Value) -> Result<(), DecryptorError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    self.descend(&escape_segment(key), child)?;
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter_mut().enumerate() {
                    self.descend(&index.to_string(), child)?;
                }
            }
            Value::String(text) => {
                if let Some(token) = marker_token(text) {
                    let plaintext = self.resolve_at(token)?;
                    *text = plaintext;
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
        Ok(())
    }

    fn descend(&mut self, segment: &str, child: &mut Value) -> Result<(), DecryptorError> {
        let parent_len = self.pointer.len();
        self.pointer.push('/');
        self.pointer.push_str(segment);
        let result = self.visit(child);
        self.pointer.truncate(parent_len);
        result
    }

    fn resolve_at(&mut self, token: &str) -> Result<String, DecryptorError> {
        debug!(pointer = %self.pointer, token_len = token.len(), "resolving encrypted value");
        let plaintext = self
            .resolver
            .resolve(token)
            .map_err(|source| DecryptorError::Resolution {
                pointer: self.pointer.clone(),
                source,
            })?;
        self.summary.resolved += 1;
        Ok(plaintext)
    }
}

/// Escapes an object key as a JSON Pointer reference token (RFC 6901).
fn escape_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::{decrypt_value, marker_token, walk, WalkSummary};
    use crate::error::{DecryptorError, ResolveError};
    use crate::resolver::Resolver;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory resolver that records every token it was asked for.
    #[derive(Default)]
    struct FakeResolver {
        plaintexts: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeResolver {
        fn with(pairs: &[(&str, &str)]) -> Self {
            Self {
                plaintexts: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: RefCell::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Resolver for FakeResolver {
        fn resolve(&self, token: &str) -> Result<String, ResolveError> {
            self.calls.borrow_mut().push(token.to_string());
            self.plaintexts
                .get(token)
                .cloned()
                .ok_or_else(|| ResolveError::Rejected {
                    status: 400,
                    body: format!("unknown token {token}"),
                })
        }
    }

    #[test]
    fn resolves_example_document() {
        let resolver = FakeResolver::with(&[("abc123", "s3cr3t")]);
        let output = decrypt_value(json!({"user": "alice", "pass": "secure:abc123"}), &resolver)
            .expect("walk should succeed");

        assert_eq!(output, json!({"user": "alice", "pass": "s3cr3t"}));
        assert_eq!(resolver.calls(), vec!["abc123"]);
    }

    #[test]
    fn documents_without_markers_are_unchanged() {
        let resolver = FakeResolver::default();
        let input = json!({
            "name": "svc",
            "port": 8080,
            "ratio": 0.25,
            "enabled": true,
            "nothing": null,
            "tags": ["a", "b", {"nested": ["secure", "x:secure:y"]}],
            "empty": {},
            "list": []
        });

        let mut value = input.clone();
        let summary = walk(&mut value, &resolver).expect("walk should succeed");

        assert_eq!(value, input);
        assert_eq!(summary, WalkSummary { resolved: 0 });
        assert!(resolver.calls().is_empty());
    }

    #[test]
    fn array_positions_are_preserved() {
        let resolver = FakeResolver::with(&[("a", "X"), ("b", "Y")]);
        let output = decrypt_value(json!(["secure:a", 1, "secure:b"]), &resolver).unwrap();

        assert_eq!(output, json!(["X", 1, "Y"]));
        assert_eq!(resolver.calls(), vec!["a", "b"]);
    }

    #[test]
    fn resolves_at_any_depth() {
        let resolver = FakeResolver::with(&[("t", "plain")]);

        assert_eq!(decrypt_value(json!("secure:t"), &resolver).unwrap(), json!("plain"));
        assert_eq!(
            decrypt_value(json!({"k": "secure:t"}), &resolver).unwrap(),
            json!({"k": "plain"})
        );

        let deep = json!({"a": [{"b": [{"c": "secure:t", "n": 1}]}]});
        assert_eq!(
            decrypt_value(deep, &resolver).unwrap(),
            json!({"a": [{"b": [{"c": "plain", "n": 1}]}]})
        );
    }

    #[test]
    fn prefix_match_is_strict() {
        assert_eq!(marker_token("secure:foo"), Some("foo"));
        assert_eq!(marker_token("insecure:foo"), None);
        assert_eq!(marker_token("notsecure:xyz"), None);
        assert_eq!(marker_token("Secure:foo"), None);
        assert_eq!(marker_token(" secure:foo"), None);
        assert_eq!(marker_token("secure"), None);
    }

    #[test]
    fn token_keeps_everything_after_first_colon() {
        assert_eq!(marker_token("secure:a:b:c"), Some("a:b:c"));

        let resolver = FakeResolver::with(&[("a:b:c", "joined")]);
        let output = decrypt_value(json!({"v": "secure:a:b:c"}), &resolver).unwrap();
        assert_eq!(output, json!({"v": "joined"}));
    }

    #[test]
    fn empty_token_is_forwarded() {
        let resolver = FakeResolver::with(&[("", "from-empty")]);
        let output = decrypt_value(json!(["secure:"]), &resolver).unwrap();

        assert_eq!(output, json!(["from-empty"]));
        assert_eq!(resolver.calls(), vec![""]);
    }

    #[test]
    fn keys_are_never_resolved() {
        let resolver = FakeResolver::with(&[("k", "nope"), ("v", "yes")]);
        let output = decrypt_value(json!({"secure:k": "secure:v"}), &resolver).unwrap();

        assert_eq!(output, json!({"secure:k": "yes"}));
        assert_eq!(resolver.calls(), vec!["v"]);
    }

    #[test]
    fn first_failure_aborts_walk() {
        let resolver = FakeResolver::with(&[("ok", "fine"), ("later", "never")]);
        let mut value = json!(["secure:ok", {"inner": "secure:bad"}, "secure:later"]);

        let err = walk(&mut value, &resolver).unwrap_err();

        assert_eq!(resolver.calls(), vec!["ok", "bad"]);
        match err {
            DecryptorError::Resolution { pointer, source } => {
                assert_eq!(pointer, "/1/inner");
                assert!(matches!(source, ResolveError::Rejected { status: 400, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_pointer_escapes_keys() {
        let resolver = FakeResolver::default();
        let err = decrypt_value(json!({"a/b": {"c~d": "secure:x"}}), &resolver).unwrap_err();

        match err {
            DecryptorError::Resolution { pointer, .. } => assert_eq!(pointer, "/a~1b/c~0d"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn counts_resolved_markers() {
        let resolver = FakeResolver::with(&[("1", "one"), ("2", "two")]);
        let mut value: Value = json!({"x": "secure:1", "y": ["secure:2", "secure:1"], "z": 3});

        let summary = walk(&mut value, &resolver).unwrap();
        assert_eq!(summary.resolved, 3);
    }
}

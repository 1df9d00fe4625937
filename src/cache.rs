//! Cache boundary for content lookups.
//!
//! The crate does not implement a cache. It defines the contract a
//! read-through wrapper must satisfy, plus deterministic key derivation so
//! that any two callers asking for the same content compute the same key.
//! Duplicate materialization on a cache-miss race is tolerated.

use std::fmt::Write;
use std::time::Duration;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Contract for the read-through cache consulted around content lookups.
pub trait ContentCache {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value, ttl: Duration);
}

/// Derives the cache key for one content operation: a SHA-256 digest over
/// the content-type name, the operation name, and a canonicalized rendering
/// of the call parameters. Object keys are sorted recursively, so the key
/// is invariant under parameter ordering.
pub fn cache_key(content_type: &str, operation: &str, params: &Value) -> String {
    let mut canonical = String::new();
    canonical_json(params, &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(content_type.as_bytes());
    hasher.update(b".");
    hasher.update(operation.as_bytes());
    hasher.update(b".");
    hasher.update(canonical.as_bytes());

    let digest = hasher.finalize();
    let mut key = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Infallible for String.
        let _ = write!(key, "{:02x}", byte);
    }
    key
}

fn canonical_json(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                canonical_json(item, out);
            }
            out.push(']');
        }
        Value::Object(entries) => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                canonical_json(&entries[*key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

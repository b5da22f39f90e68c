//! Content hashing for change detection.

use sha2::{Digest, Sha256};

/// SHA-256 of `content` as 64 lowercase hex characters.
///
/// Two bodies are treated as equal iff their hashes match. No normalization is
/// applied, so whitespace-only edits count as changes.
pub fn content_hash(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

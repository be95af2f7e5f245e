//! Checksum of work items (SHA-256).

use sha2::{Digest, Sha256};

/// Compute SHA-256 over the UTF-8 bytes of `item` and return the digest as
/// lowercase hex. Deterministic: equal items always hash equal.
pub fn sha256_hex(item: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(item.as_bytes());
    hex::encode(hasher.finalize())
}

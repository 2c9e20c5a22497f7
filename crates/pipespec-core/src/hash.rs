//! Content digests for component identity.
//!
//! A component's digest is the SHA-256 of its canonical serialized text.
//! Two specs that serialize identically share a digest, which is what lets
//! hosts deduplicate and cache components independently of where they came
//! from.

use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Hash raw text.
pub fn content_hash(text: &str) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().into()
}

/// Format a content hash as a lowercase hex string.
pub fn hash_hex(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Digest of canonical text, as lowercase hex.
pub fn digest_text(text: &str) -> String {
    hash_hex(&content_hash(text))
}

//! Ledger Hashing
//!
//! SHA-256 helpers for:
//! - Fingerprinting world state (tests, demo output)
//! - Producing update digests that players commit to
//!
//! The contract itself never hashes: update values are opaque strings.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Domain separator for world-state fingerprints.
const WORLD_STATE_DOMAIN: &[u8] = b"GAMENET_WORLD_STATE_V1";

/// Domain separator for player update digests.
const UPDATE_DOMAIN: &[u8] = b"GAMENET_UPDATE_V1";

/// Deterministic hasher for ledger contents.
///
/// Every variable-length field is length-prefixed so that adjacent
/// fields cannot run into each other.
pub struct LedgerHasher {
    hasher: Sha256,
}

impl LedgerHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for world state.
    pub fn for_world_state() -> Self {
        Self::new(WORLD_STATE_DOMAIN)
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with length-prefixed bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.update_u64(bytes.len() as u64);
        self.hasher.update(bytes);
    }

    /// Update with one key/value entry.
    #[inline]
    pub fn update_entry(&mut self, key: &str, value: &[u8]) {
        self.update_bytes(key.as_bytes());
        self.update_bytes(value);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Hex digest of a player update payload.
///
/// Clients publish this with `issue` and later reveal the same value as
/// the proof passed to `check`.
pub fn update_digest(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(UPDATE_DOMAIN);
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let make_hash = || {
            let mut hasher = LedgerHasher::for_world_state();
            hasher.update_entry("a", b"1");
            hasher.update_entry("b", b"2");
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_length_prefix_prevents_shifting() {
        let hash1 = {
            let mut h = LedgerHasher::new(b"test");
            h.update_entry("ab", b"c");
            h.finalize()
        };

        let hash2 = {
            let mut h = LedgerHasher::new(b"test");
            h.update_entry("a", b"bc");
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_update_digest() {
        let digest = update_digest(b"move 3 north");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, update_digest(b"move 3 north"));
        assert_ne!(digest, update_digest(b"move 4 north"));
    }
}

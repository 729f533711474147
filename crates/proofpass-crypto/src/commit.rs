//! Commitment engine
//!
//! `commit` is a binding, hiding digest over arbitrary bytes: SHA3-256.
//! Identical input gives identical output; a single-bit change flips the
//! output with overwhelming probability. The only failure mode is an
//! oversized input, rejected deterministically. No side effects.

use sha3::{Digest, Sha3_256};
use thiserror::Error;

use proofpass_core::Commitment;

/// Maximum accepted input size for a single commitment (1 MiB).
pub const MAX_COMMIT_INPUT: usize = 1 << 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("commitment input of {got} bytes exceeds the {MAX_COMMIT_INPUT} byte limit")]
    InputTooLarge { got: usize },
}

/// Commit to a byte string.
pub fn commit(data: &[u8]) -> Result<Commitment, CommitError> {
    if data.len() > MAX_COMMIT_INPUT {
        return Err(CommitError::InputTooLarge { got: data.len() });
    }
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    Ok(Commitment::from_bytes(hasher.finalize().into()))
}

/// Commit to a UTF-8 string.
pub fn commit_str(data: &str) -> Result<Commitment, CommitError> {
    commit(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_deterministic() {
        let a = commit(b"hello").unwrap();
        let b = commit(b"hello").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_commit_input_sensitivity() {
        // Single-bit flip in the input must change the digest.
        let base = commit(b"hello").unwrap();
        let flipped = commit(b"hellp").unwrap();
        assert_ne!(base, flipped);
    }

    #[test]
    fn test_commit_avalanche() {
        // Statistical check: flipping one bit should flip roughly half the
        // output bits, and never produce a near-identical digest.
        let a = commit(b"avalanche input 0").unwrap();
        let b = commit(b"avalanche input 1").unwrap();
        let differing: u32 = a
            .as_bytes()
            .iter()
            .zip(b.as_bytes())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum();
        assert!(differing > 64, "only {differing} of 256 bits differ");
        assert!(differing < 192, "{differing} of 256 bits differ");
    }

    #[test]
    fn test_commit_rejects_oversized_input() {
        let big = vec![0u8; MAX_COMMIT_INPUT + 1];
        assert!(matches!(
            commit(&big),
            Err(CommitError::InputTooLarge { .. })
        ));

        // Exactly at the limit is fine.
        let at_limit = vec![0u8; MAX_COMMIT_INPUT];
        assert!(commit(&at_limit).is_ok());
    }

    #[test]
    fn test_commit_never_collides_across_samples() {
        // Not a proof, but a cheap regression net: distinct short inputs
        // must hash to distinct digests.
        let mut seen = std::collections::HashSet::new();
        for i in 0..1000u32 {
            let c = commit(&i.to_be_bytes()).unwrap();
            assert!(seen.insert(*c.as_bytes()), "collision at sample {i}");
        }
    }
}

//! ProofPass Core
//!
//! Core domain types for the ProofPass proof engine.
//! This crate defines the fundamental data structures used across
//! the entire ProofPass workspace: credentials and their commitments,
//! proof tokens, nullifiers, and verification verdicts.

pub mod credential;
pub mod error;
pub mod proof;
pub mod verdict;

pub use credential::{
    Commitment, CommitmentSet, Credential, CredentialAttributes, CredentialId, HolderSecret,
};
pub use error::{validate_label, ValidationError};
pub use proof::{Nullifier, ProofId, ProofMaterial, ProofToken, TokenDecodeError};
pub use verdict::{Disclosure, InvalidReason, ProofStatus, Verdict};

/// Hex serialization for 32-byte arrays
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid byte length"))
    }
}

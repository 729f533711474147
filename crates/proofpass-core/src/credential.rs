//! Credential types for ProofPass
//!
//! A credential is a private record held in the owner's wallet. Only its
//! commitments ever leave the wallet; the attributes and the holder secret
//! do not.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zeroize::Zeroize;

use crate::error::ValidationError;

/// A binding, hiding digest standing in for a larger private value (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "crate::hex_bytes")] pub [u8; 32]);

impl Commitment {
    /// Sentinel commitment for an absent value (e.g. a credential with no issuer).
    pub const NONE: Commitment = Commitment([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether this is the "no value" sentinel.
    pub fn is_none(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Unique identifier for a credential (32-byte hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(#[serde(with = "crate::hex_bytes")] pub [u8; 32]);

impl CredentialId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// High-entropy value known only to the credential holder.
///
/// Used to derive nullifiers and proof binding keys. Never serialized into a
/// `ProofToken` and never shown in debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSecret(#[serde(with = "crate::hex_bytes")] [u8; 32]);

impl HolderSecret {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for HolderSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HolderSecret(..)")
    }
}

impl Drop for HolderSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Attributes of a credential as entered by the holder.
///
/// `name` and `credential_type` are required; everything else is optional.
/// `extra` is a sorted map so that canonical encoding never depends on
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialAttributes {
    /// Display name, e.g. "Bachelor of Computer Science"
    pub name: String,

    /// Credential type / schema identifier, e.g. "degree"
    pub credential_type: String,

    /// Issuing party, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Date the underlying credential was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<NaiveDate>,

    /// Free-form holder notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Deployment-specific attributes, keyed and sorted by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CredentialAttributes {
    pub fn new(name: impl Into<String>, credential_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credential_type: credential_type.into(),
            ..Default::default()
        }
    }

    /// Check that required attributes are present and non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingAttribute("name"));
        }
        if self.credential_type.trim().is_empty() {
            return Err(ValidationError::MissingAttribute("credential_type"));
        }
        Ok(())
    }
}

/// The three commitments derived from a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentSet {
    pub payload_commitment: Commitment,
    pub issuer_commitment: Commitment,
    pub schema_commitment: Commitment,
}

/// A committed credential, private to its holder.
///
/// Immutable after creation. The engine never deletes a credential; only the
/// holder can remove it from their wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique credential identifier (hash of the payload commitment)
    pub id: CredentialId,

    /// The attributes this credential commits to (wallet-local only)
    pub attributes: CredentialAttributes,

    /// Commitment to the canonical encoding of all attributes
    pub payload_commitment: Commitment,

    /// Commitment to the issuer identifier, or `Commitment::NONE`
    pub issuer_commitment: Commitment,

    /// Commitment to the credential type / schema identifier
    pub schema_commitment: Commitment,

    /// Holder secret used to derive nullifiers and binding keys
    pub secret: HolderSecret,

    /// When the credential was created
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Project the public commitments. Pure; no recomputation.
    pub fn commitments(&self) -> CommitmentSet {
        CommitmentSet {
            payload_commitment: self.payload_commitment,
            issuer_commitment: self.issuer_commitment,
            schema_commitment: self.schema_commitment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_rejected() {
        let attrs = CredentialAttributes::new("  ", "degree");
        assert!(matches!(
            attrs.validate(),
            Err(ValidationError::MissingAttribute("name"))
        ));
    }

    #[test]
    fn test_missing_type_rejected() {
        let attrs = CredentialAttributes::new("Alice", "");
        assert!(matches!(
            attrs.validate(),
            Err(ValidationError::MissingAttribute("credential_type"))
        ));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = HolderSecret::from_bytes([7u8; 32]);
        assert_eq!(format!("{:?}", secret), "HolderSecret(..)");
    }

    #[test]
    fn test_commitment_sentinel() {
        assert!(Commitment::NONE.is_none());
        assert!(!Commitment::from_bytes([1u8; 32]).is_none());
    }
}

//! Proof token types for ProofPass
//!
//! A `ProofToken` is the only artifact ever shared with a verifier. It
//! carries commitments and derived values, never raw attributes or the
//! holder secret. All fields are immutable after issuance; consumption
//! state lives exclusively in the nullifier registry.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credential::Commitment;
use crate::error::{validate_label, ValidationError};

/// Unique identifier for a proof instance.
///
/// Fresh random on issuance (never content-derived, so tokens leak nothing
/// about issuance order).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofId(pub String);

impl ProofId {
    const PREFIX: &'static str = "pp_";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random proof id.
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A well-formed id is the `pp_` prefix followed by 32 lowercase hex chars.
    pub fn is_well_formed(&self) -> bool {
        match self.0.strip_prefix(Self::PREFIX) {
            Some(rest) => {
                rest.len() == 32 && rest.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
            }
            None => false,
        }
    }
}

impl std::fmt::Display for ProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A one-way derived value used to detect reuse of a proof without
/// revealing which credential produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nullifier(#[serde(with = "crate::hex_bytes")] pub [u8; 32]);

impl Nullifier {
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

impl std::fmt::Display for Nullifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Opaque cryptographic evidence binding a token's public fields to the
/// underlying credential commitment.
///
/// `binding_key` is derived one-way from the holder secret and the proof id;
/// `tag` is a keyed hash over every public field of the token. The key
/// travels with the token, so the tag catches corruption and accidental
/// edits rather than deliberate forgery. This is the seam where a real
/// proving backend would slot in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMaterial {
    #[serde(with = "crate::hex_bytes")]
    pub binding_key: [u8; 32],

    #[serde(with = "crate::hex_bytes")]
    pub tag: [u8; 32],
}

/// A purpose-bound, time-limited proof token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofToken {
    /// Globally unique identifier for this proof instance
    pub proof_id: ProofId,

    /// The payload commitment this proof attests against
    pub credential_ref: Commitment,

    /// Allowed use context, e.g. "bar-entry"
    pub purpose: String,

    /// Identifier of the intended verifying party
    pub recipient: String,

    /// Start of the validity window
    pub issued_at: DateTime<Utc>,

    /// End of the validity window
    pub expires_at: DateTime<Utc>,

    /// Whether the proof dies on first successful verification
    pub one_time_use: bool,

    /// Derived from (secret, proof_id, purpose, recipient)
    pub nullifier: Nullifier,

    /// Binding over all of the above
    pub material: ProofMaterial,
}

/// Failure to decode a transmitted token.
#[derive(Error, Debug)]
pub enum TokenDecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid token JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProofToken {
    /// Structural well-formedness check (verification step 1).
    ///
    /// Purely local: no clock, no registry, no crypto.
    pub fn check_structure(&self) -> Result<(), ValidationError> {
        if !self.proof_id.is_well_formed() {
            return Err(ValidationError::MalformedProofId);
        }
        validate_label("purpose", &self.purpose)?;
        validate_label("recipient", &self.recipient)?;
        if self.expires_at <= self.issued_at {
            return Err(ValidationError::InvalidWindow);
        }
        Ok(())
    }

    /// Whether the validity window has passed at time `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Encode for out-of-band hand-off: canonical JSON (fixed field order)
    /// wrapped in base64.
    pub fn encode(&self) -> String {
        // Serialization of a struct with named fields is deterministic.
        let json = serde_json::to_vec(self).expect("token serialization cannot fail");
        BASE64.encode(json)
    }

    /// Decode a token produced by [`ProofToken::encode`].
    pub fn decode(encoded: &str) -> Result<Self, TokenDecodeError> {
        let json = BASE64.decode(encoded.trim())?;
        Ok(serde_json::from_slice(&json)?)
    }
}

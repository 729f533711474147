//! Proof-material binding
//!
//! The binding stands in for the proving backend: a keyed commitment over
//! every public field of a token. The binding key is derived one-way from
//! the holder secret and the proof id (`blake3::derive_key`), so it reveals
//! nothing about the secret; the tag is keyed BLAKE3 over the canonical
//! field encoding, covering every public field (purpose included).
//!
//! The key travels inside the token, so the tag is an integrity check, not
//! a forgery barrier: anyone holding a token can rewrite a field and
//! recompute a matching tag. It catches corruption and honest mistakes;
//! adversarial unforgeability is the job of the proving backend this seam
//! is shaped for.

use chrono::{DateTime, Utc};

use proofpass_core::{Commitment, HolderSecret, Nullifier, ProofId, ProofMaterial, ProofToken};

use crate::canonical::put_field;

const BINDING_KEY_CONTEXT: &str = "proofpass.binding-key.v1";
const TAG_DOMAIN: &[u8] = b"proofpass.binding-tag.v1";

/// The public fields covered by a binding tag.
pub struct BindingFields<'a> {
    pub proof_id: &'a ProofId,
    pub credential_ref: &'a Commitment,
    pub purpose: &'a str,
    pub recipient: &'a str,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub one_time_use: bool,
    pub nullifier: &'a Nullifier,
}

impl<'a> From<&'a ProofToken> for BindingFields<'a> {
    fn from(token: &'a ProofToken) -> Self {
        Self {
            proof_id: &token.proof_id,
            credential_ref: &token.credential_ref,
            purpose: &token.purpose,
            recipient: &token.recipient,
            issued_at: token.issued_at,
            expires_at: token.expires_at,
            one_time_use: token.one_time_use,
            nullifier: &token.nullifier,
        }
    }
}

impl BindingFields<'_> {
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(192);
        out.extend_from_slice(TAG_DOMAIN);
        put_field(&mut out, self.proof_id.as_str().as_bytes());
        put_field(&mut out, self.credential_ref.as_bytes());
        put_field(&mut out, self.purpose.as_bytes());
        put_field(&mut out, self.recipient.as_bytes());
        out.extend_from_slice(&self.issued_at.timestamp_millis().to_le_bytes());
        out.extend_from_slice(&self.expires_at.timestamp_millis().to_le_bytes());
        out.push(self.one_time_use as u8);
        put_field(&mut out, self.nullifier.as_bytes());
        out
    }
}

/// Derive the per-proof binding key from the holder secret and proof id.
pub fn derive_binding_key(secret: &HolderSecret, proof_id: &ProofId) -> [u8; 32] {
    let mut material = Vec::with_capacity(64);
    material.extend_from_slice(secret.as_bytes());
    put_field(&mut material, proof_id.as_str().as_bytes());
    blake3::derive_key(BINDING_KEY_CONTEXT, &material)
}

/// Compute the binding tag over a token's public fields.
pub fn binding_tag(binding_key: &[u8; 32], fields: &BindingFields<'_>) -> [u8; 32] {
    *blake3::keyed_hash(binding_key, &fields.encode()).as_bytes()
}

/// Verify a token's proof material against its public fields.
///
/// Constant-time tag comparison via `blake3::Hash` equality.
pub fn verify_binding(material: &ProofMaterial, fields: &BindingFields<'_>) -> bool {
    let expected = blake3::keyed_hash(&material.binding_key, &fields.encode());
    expected == blake3::Hash::from(material.tag)
}

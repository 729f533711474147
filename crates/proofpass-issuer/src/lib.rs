//! ProofPass Issuer
//!
//! Builds purpose-bound proof tokens from a credential, a purpose, a
//! recipient, and an expiry window. Issuance is pure with respect to shared
//! state: the nullifier registry is only touched at verification time, so a
//! freshly issued proof is never dead on arrival.

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::info;

use proofpass_core::{
    validate_label, Credential, ProofId, ProofMaterial, ProofToken, ValidationError,
};
use proofpass_crypto::{binding_tag, derive_binding_key, derive_nullifier, BindingFields};

#[derive(Error, Debug)]
pub enum IssueError {
    #[error("invalid proof request: {0}")]
    Validation(#[from] ValidationError),

    #[error("ttl must be positive, got {0}s")]
    NonPositiveTtl(i64),

    #[error("ttl of {requested}s exceeds the configured maximum of {max}s")]
    TtlExceedsMax { requested: i64, max: i64 },
}

/// Deployer policy for proof issuance.
#[derive(Debug, Clone)]
pub struct IssuerPolicy {
    /// Upper bound on a proof's validity window.
    pub max_ttl: Duration,
}

impl Default for IssuerPolicy {
    fn default() -> Self {
        Self {
            // Rejecting absurd validity windows is a deployer decision; 30
            // days is the shipped ceiling.
            max_ttl: Duration::days(30),
        }
    }
}

/// Proof issuance service.
pub struct ProofIssuer {
    policy: IssuerPolicy,
}

impl ProofIssuer {
    pub fn new(policy: IssuerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IssuerPolicy {
        &self.policy
    }

    /// Issue a purpose-bound proof token from a credential.
    ///
    /// The proof id is fresh random (never content-derived), the nullifier
    /// is `KDF(secret, proof_id, purpose, recipient)`, and the proof
    /// material binds every public field of the token. Attributes and the
    /// holder secret do not appear in the result.
    pub fn issue_proof(
        &self,
        credential: &Credential,
        purpose: &str,
        recipient: &str,
        ttl: Duration,
        one_time_use: bool,
    ) -> Result<ProofToken, IssueError> {
        validate_label("purpose", purpose)?;
        validate_label("recipient", recipient)?;

        if ttl <= Duration::zero() {
            return Err(IssueError::NonPositiveTtl(ttl.num_seconds()));
        }
        if ttl > self.policy.max_ttl {
            return Err(IssueError::TtlExceedsMax {
                requested: ttl.num_seconds(),
                max: self.policy.max_ttl.num_seconds(),
            });
        }

        let proof_id = ProofId::generate();
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl;

        let nullifier = derive_nullifier(&credential.secret, &proof_id, purpose, recipient);
        let binding_key = derive_binding_key(&credential.secret, &proof_id);

        let fields = BindingFields {
            proof_id: &proof_id,
            credential_ref: &credential.payload_commitment,
            purpose,
            recipient,
            issued_at,
            expires_at,
            one_time_use,
            nullifier: &nullifier,
        };
        let tag = binding_tag(&binding_key, &fields);

        let token = ProofToken {
            proof_id,
            credential_ref: credential.payload_commitment,
            purpose: purpose.to_string(),
            recipient: recipient.to_string(),
            issued_at,
            expires_at,
            one_time_use,
            nullifier,
            material: ProofMaterial { binding_key, tag },
        };

        info!(
            proof = %token.proof_id,
            purpose,
            recipient,
            one_time_use,
            ttl_seconds = ttl.num_seconds(),
            "proof issued"
        );
        Ok(token)
    }
}

impl Default for ProofIssuer {
    fn default() -> Self {
        Self::new(IssuerPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofpass_core::{Commitment, CredentialAttributes, CredentialId, HolderSecret};

    fn credential_fixture() -> Credential {
        Credential {
            id: CredentialId::from_bytes([1u8; 32]),
            attributes: CredentialAttributes::new("Alice", "age"),
            payload_commitment: Commitment::from_bytes([2u8; 32]),
            issuer_commitment: Commitment::from_bytes([3u8; 32]),
            schema_commitment: Commitment::from_bytes([4u8; 32]),
            secret: HolderSecret::from_bytes([5u8; 32]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_proof_basic() {
        let issuer = ProofIssuer::default();
        let cred = credential_fixture();

        let token = issuer
            .issue_proof(&cred, "bar-entry", "VenueX", Duration::hours(1), true)
            .unwrap();

        assert!(token.proof_id.is_well_formed());
        assert_eq!(token.credential_ref, cred.payload_commitment);
        assert!(token.expires_at > token.issued_at);
        assert!(token.check_structure().is_ok());
    }

    #[test]
    fn test_issue_rejects_bad_labels() {
        let issuer = ProofIssuer::default();
        let cred = credential_fixture();

        assert!(matches!(
            issuer.issue_proof(&cred, "", "VenueX", Duration::hours(1), true),
            Err(IssueError::Validation(_))
        ));
        assert!(matches!(
            issuer.issue_proof(&cred, "bar-entry", "Venue\0X", Duration::hours(1), true),
            Err(IssueError::Validation(_))
        ));
    }

    #[test]
    fn test_issue_rejects_bad_ttl() {
        let issuer = ProofIssuer::default();
        let cred = credential_fixture();

        assert!(matches!(
            issuer.issue_proof(&cred, "bar-entry", "VenueX", Duration::zero(), true),
            Err(IssueError::NonPositiveTtl(_))
        ));
        assert!(matches!(
            issuer.issue_proof(&cred, "bar-entry", "VenueX", Duration::days(31), true),
            Err(IssueError::TtlExceedsMax { .. })
        ));
    }

    #[test]
    fn test_proof_ids_fresh_per_issuance() {
        let issuer = ProofIssuer::default();
        let cred = credential_fixture();

        let a = issuer
            .issue_proof(&cred, "bar-entry", "VenueX", Duration::hours(1), true)
            .unwrap();
        let b = issuer
            .issue_proof(&cred, "bar-entry", "VenueX", Duration::hours(1), true)
            .unwrap();

        assert_ne!(a.proof_id, b.proof_id);
        // Fresh proof id means a fresh nullifier even for identical
        // purpose/recipient.
        assert_ne!(a.nullifier, b.nullifier);
    }

    #[test]
    fn test_token_carries_no_secret_material() {
        let issuer = ProofIssuer::default();
        let cred = credential_fixture();
        let token = issuer
            .issue_proof(&cred, "bar-entry", "VenueX", Duration::hours(1), true)
            .unwrap();

        let encoded = serde_json::to_string(&token).unwrap();
        let secret_hex = hex::encode(cred.secret.as_bytes());
        assert!(!encoded.contains(&secret_hex));
    }
}

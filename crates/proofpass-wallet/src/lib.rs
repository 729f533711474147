//! ProofPass Wallet
//!
//! Holder-side credential store. Credentials are created here, live here,
//! and leave only as commitments; the engine never deletes one, removal is
//! a holder action.

use chrono::Utc;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use proofpass_core::{
    Commitment, CommitmentSet, Credential, CredentialAttributes, CredentialId, HolderSecret,
    ValidationError,
};
use proofpass_crypto::{
    canonical_attribute_bytes, commit, commit_str, generate_secret, CommitError,
};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("invalid credential: {0}")]
    Validation(#[from] ValidationError),

    #[error("commitment failed: {0}")]
    Commit(#[from] CommitError),

    #[error("credential not found: {0}")]
    NotFound(String),
}

/// In-memory credential store keyed by credential id.
///
/// Each credential is independent; creation requires no cross-credential
/// coordination.
#[derive(Default)]
pub struct CredentialStore {
    credentials: HashMap<CredentialId, Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a credential from its attributes.
    ///
    /// When `secret` is omitted a fresh one is drawn from the CSPRNG. The
    /// attributes are canonicalized (fixed field order) before committing,
    /// so the same logical credential always produces the same commitments.
    pub fn create_credential(
        &mut self,
        attributes: CredentialAttributes,
        secret: Option<HolderSecret>,
    ) -> Result<&Credential, WalletError> {
        attributes.validate()?;

        let payload_commitment = commit(&canonical_attribute_bytes(&attributes))?;
        let issuer_commitment = match attributes.issuer.as_deref() {
            Some(issuer) if !issuer.trim().is_empty() => commit_str(issuer)?,
            _ => Commitment::NONE,
        };
        let schema_commitment = commit_str(&attributes.credential_type)?;

        let secret = secret.unwrap_or_else(generate_secret);

        // Id is wallet-local: hashing the secret in keeps two credentials
        // with identical attributes but different holders distinct.
        let mut id_input = Vec::with_capacity(64);
        id_input.extend_from_slice(payload_commitment.as_bytes());
        id_input.extend_from_slice(secret.as_bytes());
        let id = CredentialId::from_bytes(*commit(&id_input)?.as_bytes());

        let credential = Credential {
            id: id.clone(),
            attributes,
            payload_commitment,
            issuer_commitment,
            schema_commitment,
            secret,
            created_at: Utc::now(),
        };

        debug!(credential = %id, "credential created");
        Ok(self.credentials.entry(id).or_insert(credential))
    }

    /// Import a previously created credential (e.g. loaded from holder
    /// storage). Commitments are not recomputed; a credential is immutable
    /// after creation.
    pub fn import(&mut self, credential: Credential) {
        self.credentials.insert(credential.id.clone(), credential);
    }

    /// Pure projection of a credential's public commitments.
    pub fn get_commitments(&self, id: &CredentialId) -> Option<CommitmentSet> {
        self.credentials.get(id).map(Credential::commitments)
    }

    pub fn get(&self, id: &CredentialId) -> Option<&Credential> {
        self.credentials.get(id)
    }

    pub fn list(&self) -> Vec<&Credential> {
        self.credentials.values().collect()
    }

    /// Holder-initiated deletion. The only way a credential leaves the store.
    pub fn remove(&mut self, id: &CredentialId) -> Option<Credential> {
        self.credentials.remove(id)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> CredentialAttributes {
        let mut a = CredentialAttributes::new("Alice", "age");
        a.issuer = Some("DMV".to_string());
        a
    }

    #[test]
    fn test_create_rejects_missing_required() {
        let mut store = CredentialStore::new();
        let result = store.create_credential(CredentialAttributes::new("", "age"), None);
        assert!(matches!(result, Err(WalletError::Validation(_))));
    }

    #[test]
    fn test_identical_attributes_identical_commitment() {
        let mut store = CredentialStore::new();
        let first = store
            .create_credential(attrs(), Some(HolderSecret::from_bytes([1u8; 32])))
            .unwrap()
            .payload_commitment;
        let second = store
            .create_credential(attrs(), Some(HolderSecret::from_bytes([2u8; 32])))
            .unwrap()
            .payload_commitment;
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_field_change_changes_commitment() {
        let mut store = CredentialStore::new();
        let base = store.create_credential(attrs(), None).unwrap().payload_commitment;

        let mut changed = attrs();
        changed.issuer = Some("DOT".to_string());
        let other = store
            .create_credential(changed, None)
            .unwrap()
            .payload_commitment;
        assert_ne!(base, other);
    }

    #[test]
    fn test_no_issuer_uses_sentinel() {
        let mut store = CredentialStore::new();
        let cred = store
            .create_credential(CredentialAttributes::new("cert", "course"), None)
            .unwrap();
        assert!(cred.issuer_commitment.is_none());
    }

    #[test]
    fn test_commitment_projection_matches() {
        let mut store = CredentialStore::new();
        let id = store.create_credential(attrs(), None).unwrap().id.clone();

        let set = store.get_commitments(&id).unwrap();
        let cred = store.get(&id).unwrap();
        assert_eq!(set.payload_commitment, cred.payload_commitment);
        assert_eq!(set.issuer_commitment, cred.issuer_commitment);
        assert_eq!(set.schema_commitment, cred.schema_commitment);
    }

    #[test]
    fn test_holder_removal() {
        let mut store = CredentialStore::new();
        let id = store.create_credential(attrs(), None).unwrap().id.clone();
        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
    }
}

//! ProofPass Proof Archive
//!
//! Append-only audit storage for issued proof tokens, keyed by proof id.
//! Tokens are never physically deleted; a proof becomes functionally dead by
//! expiring or by its nullifier being consumed, both of which are computed
//! views, not stored state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

use proofpass_core::{ProofId, ProofToken};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("proof not found: {0}")]
    NotFound(String),

    #[error("proof already recorded: {0}")]
    Duplicate(String),

    #[error("archive storage unavailable: {0}")]
    Unavailable(String),
}

/// An archived proof token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedProof {
    pub token: ProofToken,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only archive of issued proofs.
#[async_trait]
pub trait ProofArchive: Send + Sync {
    /// Record an issued token. Recording the same proof id twice is an
    /// error: archived tokens are immutable.
    async fn record(&self, token: ProofToken) -> Result<(), ArchiveError>;

    /// Fetch an archived token by proof id.
    async fn get(&self, id: &ProofId) -> Result<ArchivedProof, ArchiveError>;

    /// List all archived proof ids.
    async fn list_ids(&self) -> Result<Vec<ProofId>, ArchiveError>;
}

/// In-memory archive (development and tests).
#[derive(Default)]
pub struct InMemoryProofArchive {
    proofs: RwLock<HashMap<ProofId, ArchivedProof>>,
}

impl InMemoryProofArchive {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProofArchive for InMemoryProofArchive {
    async fn record(&self, token: ProofToken) -> Result<(), ArchiveError> {
        let mut proofs = self
            .proofs
            .write()
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        if proofs.contains_key(&token.proof_id) {
            return Err(ArchiveError::Duplicate(token.proof_id.to_string()));
        }
        proofs.insert(
            token.proof_id.clone(),
            ArchivedProof {
                token,
                recorded_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, id: &ProofId) -> Result<ArchivedProof, ArchiveError> {
        let proofs = self
            .proofs
            .read()
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        proofs
            .get(id)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(id.to_string()))
    }

    async fn list_ids(&self) -> Result<Vec<ProofId>, ArchiveError> {
        let proofs = self
            .proofs
            .read()
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;
        Ok(proofs.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proofpass_core::{Commitment, Nullifier, ProofMaterial};

    fn token() -> ProofToken {
        let now = Utc::now();
        ProofToken {
            proof_id: ProofId::generate(),
            credential_ref: Commitment::from_bytes([1u8; 32]),
            purpose: "bar-entry".into(),
            recipient: "VenueX".into(),
            issued_at: now,
            expires_at: now + Duration::hours(1),
            one_time_use: true,
            nullifier: Nullifier::from_bytes([2u8; 32]),
            material: ProofMaterial {
                binding_key: [3u8; 32],
                tag: [4u8; 32],
            },
        }
    }

    #[tokio::test]
    async fn test_record_and_get() {
        let archive = InMemoryProofArchive::new();
        let t = token();
        let id = t.proof_id.clone();

        archive.record(t.clone()).await.unwrap();
        let archived = archive.get(&id).await.unwrap();
        assert_eq!(archived.token, t);
    }

    #[tokio::test]
    async fn test_duplicate_record_rejected() {
        let archive = InMemoryProofArchive::new();
        let t = token();

        archive.record(t.clone()).await.unwrap();
        assert!(matches!(
            archive.record(t).await,
            Err(ArchiveError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let archive = InMemoryProofArchive::new();
        assert!(matches!(
            archive.get(&ProofId::generate()).await,
            Err(ArchiveError::NotFound(_))
        ));
    }
}

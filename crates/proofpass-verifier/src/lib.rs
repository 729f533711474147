//! ProofPass Verifier
//!
//! Validates presented proof tokens against their stated constraints and
//! atomically consumes one-time proofs through the nullifier registry.
//!
//! The engine sees only the token and the verifying party's identity. It
//! never has access to credential attributes or the holder secret, and a
//! successful verification discloses nothing beyond the verdict and the
//! fields the prover chose to share ([`Disclosure`]).

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use proofpass_core::{
    Disclosure, InvalidReason, ProofId, ProofStatus, ProofToken, Verdict,
};
use proofpass_crypto::{verify_binding, BindingFields};
use proofpass_proof_store::{ArchiveError, ProofArchive};
use proofpass_registry::{NullifierRegistry, RegistryError};

#[derive(Error, Debug)]
pub enum VerifyError {
    /// The consumption or audit store could not be reached. Fail closed:
    /// this is never reported as a verdict.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("no proof recorded under id {0}")]
    UnknownProof(String),

    #[error("no proof archive configured")]
    NoArchive,
}

impl From<RegistryError> for VerifyError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Unavailable(msg) => VerifyError::StorageUnavailable(msg),
        }
    }
}

/// Verification engine over a nullifier registry and an optional audit
/// archive (required only for [`VerificationEngine::proof_status`]).
pub struct VerificationEngine {
    registry: Arc<dyn NullifierRegistry>,
    archive: Option<Arc<dyn ProofArchive>>,
}

impl VerificationEngine {
    pub fn new(registry: Arc<dyn NullifierRegistry>) -> Self {
        Self {
            registry,
            archive: None,
        }
    }

    pub fn with_archive(mut self, archive: Arc<dyn ProofArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Record an issued token for later status queries. Issuance itself
    /// never writes to the registry; this touches only the audit archive.
    pub async fn record_issued(&self, token: &ProofToken) -> Result<(), VerifyError> {
        match &self.archive {
            Some(archive) => archive.record(token.clone()).await.map_err(map_archive),
            None => Err(VerifyError::NoArchive),
        }
    }

    /// Verify a presented token on behalf of `presented_to`.
    ///
    /// Checks run in order and short-circuit at the first failure:
    /// structure, recipient, expiry, cryptographic binding, consumption.
    /// `Expired` and `AlreadyUsed` are verdicts, not errors; only storage
    /// faults surface as `Err`.
    pub async fn verify(
        &self,
        token: &ProofToken,
        presented_to: &str,
    ) -> Result<Verdict, VerifyError> {
        // 1. Structural check
        if let Err(reason) = token.check_structure() {
            debug!(proof = %token.proof_id, %reason, "malformed token");
            return Ok(Verdict::Invalid(InvalidReason::Malformed));
        }

        // 2. Recipient check: purpose-binding at the identity level. A proof
        //    minted for A is categorically rejected by B before any
        //    cryptography runs.
        if token.recipient != presented_to {
            debug!(proof = %token.proof_id, presented_to, "wrong recipient");
            return Ok(Verdict::Invalid(InvalidReason::WrongRecipient));
        }

        // 3. Expiry check. First-seen reason wins: a proof consumed before
        //    its window closed stays AlreadyUsed forever, so consult the
        //    registry read-only before reporting Expired.
        if token.is_expired_at(chrono::Utc::now()) {
            if token.one_time_use && self.registry.is_consumed(&token.nullifier).await? {
                return Ok(Verdict::AlreadyUsed);
            }
            return Ok(Verdict::Expired);
        }

        // 4. Cryptographic check: the material must bind every public field,
        //    purpose included.
        if !verify_binding(&token.material, &BindingFields::from(token)) {
            debug!(proof = %token.proof_id, "binding verification failed");
            return Ok(Verdict::Invalid(InvalidReason::BadProof));
        }

        // 5. Consumption check: atomic first-use claim. Of N concurrent
        //    presentations of the same one-time proof, exactly one passes.
        if token.one_time_use && !self.registry.try_consume(&token.nullifier).await? {
            info!(proof = %token.proof_id, "replay of consumed proof");
            return Ok(Verdict::AlreadyUsed);
        }

        info!(proof = %token.proof_id, purpose = %token.purpose, "proof verified");
        Ok(Verdict::Valid(Disclosure {
            purpose: token.purpose.clone(),
            issued_at: token.issued_at,
            expires_at: token.expires_at,
            one_time_use: token.one_time_use,
        }))
    }

    /// Point-in-time status of an archived proof.
    ///
    /// Recomputed from `(expires_at, registry state)` on every call; there
    /// is no stored status field to drift. `Used` wins over `Expired`.
    pub async fn proof_status(&self, id: &ProofId) -> Result<ProofStatus, VerifyError> {
        let archive = self.archive.as_ref().ok_or(VerifyError::NoArchive)?;
        let archived = archive.get(id).await.map_err(map_archive)?;
        let token = &archived.token;

        if token.one_time_use && self.registry.is_consumed(&token.nullifier).await? {
            return Ok(ProofStatus::Used);
        }
        if token.is_expired_at(chrono::Utc::now()) {
            return Ok(ProofStatus::Expired);
        }
        Ok(ProofStatus::Active)
    }
}

fn map_archive(err: ArchiveError) -> VerifyError {
    match err {
        ArchiveError::NotFound(id) => VerifyError::UnknownProof(id),
        ArchiveError::Duplicate(id) => {
            VerifyError::StorageUnavailable(format!("duplicate proof record {id}"))
        }
        ArchiveError::Unavailable(msg) => VerifyError::StorageUnavailable(msg),
    }
}

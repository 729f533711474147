//! Durable implementations of the registry and archive traits
//!
//! `try_consume` is a transactional compare-and-insert against the unique
//! index on `nullifiers.nullifier`; the database serializes racing callers,
//! so exactly one insert wins. Any sqlx failure maps to the fail-closed
//! `Unavailable` variant; a registry that cannot answer never reports a
//! nullifier as fresh or as used.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::debug;

use proofpass_core::{Nullifier, ProofId, ProofToken};
use proofpass_proof_store::{ArchiveError, ArchivedProof, ProofArchive};
use proofpass_registry::{NullifierRegistry, RegistryError};

/// Nullifier registry backed by PostgreSQL.
#[derive(Clone)]
pub struct PgNullifierRegistry {
    pool: PgPool,
}

impl PgNullifierRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Prune records consumed before `cutoff`. Safe only once the parent
    /// proofs are past expiry. Deliberately not on the trait.
    pub async fn prune_consumed_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, RegistryError> {
        let result = sqlx::query("DELETE FROM nullifiers WHERE consumed_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl NullifierRegistry for PgNullifierRegistry {
    async fn try_consume(&self, nullifier: &Nullifier) -> Result<bool, RegistryError> {
        let result = sqlx::query(
            "INSERT INTO nullifiers (nullifier, consumed_at) VALUES ($1, now()) \
             ON CONFLICT (nullifier) DO NOTHING",
        )
        .bind(nullifier.as_bytes().as_slice())
        .execute(&self.pool)
        .await
        .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        let consumed = result.rows_affected() == 1;
        if consumed {
            debug!(nullifier = %nullifier, "nullifier consumed");
        }
        Ok(consumed)
    }

    async fn is_consumed(&self, nullifier: &Nullifier) -> Result<bool, RegistryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM nullifiers WHERE nullifier = $1")
                .bind(nullifier.as_bytes().as_slice())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(count > 0)
    }

    async fn consumed_at(
        &self,
        nullifier: &Nullifier,
    ) -> Result<Option<DateTime<Utc>>, RegistryError> {
        sqlx::query_scalar("SELECT consumed_at FROM nullifiers WHERE nullifier = $1")
            .bind(nullifier.as_bytes().as_slice())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }
}

/// Append-only proof archive backed by PostgreSQL.
#[derive(Clone)]
pub struct PgProofArchive {
    pool: PgPool,
}

impl PgProofArchive {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProofArchive for PgProofArchive {
    async fn record(&self, token: ProofToken) -> Result<(), ArchiveError> {
        let token_json = serde_json::to_string(&token)
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO proofs (proof_id, token_json, recorded_at) VALUES ($1, $2, now()) \
             ON CONFLICT (proof_id) DO NOTHING",
        )
        .bind(token.proof_id.as_str())
        .bind(&token_json)
        .execute(&self.pool)
        .await
        .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ArchiveError::Duplicate(token.proof_id.to_string()));
        }
        Ok(())
    }

    async fn get(&self, id: &ProofId) -> Result<ArchivedProof, ArchiveError> {
        let row = sqlx::query(
            "SELECT token_json, recorded_at FROM proofs WHERE proof_id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ArchiveError::Unavailable(e.to_string()))?
        .ok_or_else(|| ArchiveError::NotFound(id.to_string()))?;

        let token_json: String = row
            .try_get("token_json")
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;
        let recorded_at: DateTime<Utc> = row
            .try_get("recorded_at")
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        let token: ProofToken = serde_json::from_str(&token_json)
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;
        Ok(ArchivedProof { token, recorded_at })
    }

    async fn list_ids(&self) -> Result<Vec<ProofId>, ArchiveError> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT proof_id FROM proofs ORDER BY recorded_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;
        Ok(ids.into_iter().map(ProofId::new).collect())
    }
}

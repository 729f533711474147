//! ProofPass Nullifier Registry
//!
//! The single source of truth for proof consumption state, and the only
//! shared mutable resource in the engine. `try_consume` must be atomic with
//! respect to concurrent callers: of N racing calls with the same nullifier
//! exactly one returns `true`. A check followed by a separate write is not
//! acceptable; the in-memory backend holds the write lock across
//! check-and-insert, the durable backend relies on a unique index.
//!
//! Storage faults are surfaced as [`RegistryError::Unavailable`] and must
//! never be interpreted as "already used" or "valid": an engine that cannot
//! prove a nullifier unconsumed refuses to consume it (fail closed).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

use proofpass_core::Nullifier;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("nullifier storage unavailable: {0}")]
    Unavailable(String),
}

/// Tracks which nullifiers have been consumed.
///
/// No deletion operation is exposed; nullifier history is permanent for the
/// life of the system. Concrete backends may offer bounded retention for
/// records whose parent proofs are long expired.
#[async_trait]
pub trait NullifierRegistry: Send + Sync {
    /// Atomically consume a nullifier on first use.
    ///
    /// Returns `true` if this call inserted the record (first use), `false`
    /// if a record already existed. Never mutates state on the `false` path.
    async fn try_consume(&self, nullifier: &Nullifier) -> Result<bool, RegistryError>;

    /// Read-only consumption check. No side effects.
    async fn is_consumed(&self, nullifier: &Nullifier) -> Result<bool, RegistryError>;

    /// When the nullifier was consumed, if it was.
    async fn consumed_at(
        &self,
        nullifier: &Nullifier,
    ) -> Result<Option<DateTime<Utc>>, RegistryError>;
}

/// In-memory registry.
///
/// Check-and-insert happens entirely under the write lock, giving the
/// single-writer critical section the one-time-use guarantee needs.
#[derive(Default)]
pub struct InMemoryNullifierRegistry {
    consumed: RwLock<HashMap<Nullifier, DateTime<Utc>>>,
}

impl InMemoryNullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of consumed nullifiers (test/ops visibility).
    pub fn len(&self) -> usize {
        self.consumed.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prune records consumed before `cutoff`.
    ///
    /// Safe only for nullifiers whose parent proofs are past expiry: an
    /// expired nullifier can never legitimately be re-checked for first use.
    /// Deliberately not part of the trait.
    pub fn prune_consumed_before(&self, cutoff: DateTime<Utc>) -> Result<usize, RegistryError> {
        let mut map = self
            .consumed
            .write()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        let before = map.len();
        map.retain(|_, consumed_at| *consumed_at >= cutoff);
        Ok(before - map.len())
    }
}

#[async_trait]
impl NullifierRegistry for InMemoryNullifierRegistry {
    async fn try_consume(&self, nullifier: &Nullifier) -> Result<bool, RegistryError> {
        let mut map = self
            .consumed
            .write()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        if map.contains_key(nullifier) {
            return Ok(false);
        }
        map.insert(nullifier.clone(), Utc::now());
        debug!(nullifier = %nullifier, "nullifier consumed");
        Ok(true)
    }

    async fn is_consumed(&self, nullifier: &Nullifier) -> Result<bool, RegistryError> {
        let map = self
            .consumed
            .read()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(map.contains_key(nullifier))
    }

    async fn consumed_at(
        &self,
        nullifier: &Nullifier,
    ) -> Result<Option<DateTime<Utc>>, RegistryError> {
        let map = self
            .consumed
            .read()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(map.get(nullifier).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_use_consumes() {
        let registry = InMemoryNullifierRegistry::new();
        let n = Nullifier::from_bytes([1u8; 32]);

        assert!(!registry.is_consumed(&n).await.unwrap());
        assert!(registry.try_consume(&n).await.unwrap());
        assert!(registry.is_consumed(&n).await.unwrap());
        assert!(registry.consumed_at(&n).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_use_rejected_without_mutation() {
        let registry = InMemoryNullifierRegistry::new();
        let n = Nullifier::from_bytes([2u8; 32]);

        assert!(registry.try_consume(&n).await.unwrap());
        let first = registry.consumed_at(&n).await.unwrap();

        assert!(!registry.try_consume(&n).await.unwrap());
        // The original consumption timestamp is untouched.
        assert_eq!(registry.consumed_at(&n).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_is_consumed_has_no_side_effect() {
        let registry = InMemoryNullifierRegistry::new();
        let n = Nullifier::from_bytes([3u8; 32]);

        assert!(!registry.is_consumed(&n).await.unwrap());
        assert!(!registry.is_consumed(&n).await.unwrap());
        assert!(registry.try_consume(&n).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_consume_single_winner() {
        let registry = Arc::new(InMemoryNullifierRegistry::new());
        let n = Nullifier::from_bytes([4u8; 32]);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            let n = n.clone();
            handles.push(tokio::spawn(
                async move { registry.try_consume(&n).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_prune_consumed_before() {
        let registry = InMemoryNullifierRegistry::new();
        let old = Nullifier::from_bytes([5u8; 32]);
        registry.try_consume(&old).await.unwrap();

        // Everything consumed so far is before a future cutoff.
        let pruned = registry
            .prune_consumed_before(Utc::now() + chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(pruned, 1);
        assert!(registry.is_empty());
    }
}

//! File-backed CLI state
//!
//! The engine's outbound storage dependencies, satisfied locally: the wallet
//! file holds private credentials, the registry directory holds one file per
//! consumed nullifier (surviving process restart, as one-time use requires),
//! and the archive file holds issued tokens keyed by proof id.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use proofpass_core::{Credential, Nullifier, ProofToken};
use proofpass_registry::{NullifierRegistry, RegistryError};
use proofpass_wallet::CredentialStore;

const WALLET_FILE: &str = "wallet.json";
const REGISTRY_DIR: &str = "nullifiers";
const ARCHIVE_FILE: &str = "proofs.json";

/// Resolve and create the data directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir,
        None => {
            let home = std::env::var_os("HOME").context("HOME not set; pass --data-dir")?;
            PathBuf::from(home).join(".proofpass")
        }
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating data dir {}", dir.display()))?;
    Ok(dir)
}

/// Load the wallet from disk into a credential store.
pub fn load_wallet(data_dir: &Path) -> Result<CredentialStore> {
    let path = data_dir.join(WALLET_FILE);
    let mut store = CredentialStore::new();
    if path.exists() {
        let json = std::fs::read_to_string(&path)?;
        let credentials: Vec<Credential> = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        for credential in credentials {
            store.import(credential);
        }
    }
    Ok(store)
}

/// Persist the wallet. Plain JSON; the wallet file is the holder's private
/// store and lives under their own account.
pub fn save_wallet(data_dir: &Path, store: &CredentialStore) -> Result<()> {
    let credentials: Vec<&Credential> = store.list();
    let json = serde_json::to_string_pretty(&credentials)?;
    std::fs::write(data_dir.join(WALLET_FILE), json)?;
    Ok(())
}

/// Consumed-nullifier registry persisted as one file per nullifier.
///
/// `try_consume` relies on `create_new`: the filesystem refuses to create a
/// record that already exists, so of N racing processes exactly one wins.
/// Consumption is durable the moment the call returns; there is no separate
/// save step.
pub struct FileNullifierRegistry {
    dir: PathBuf,
}

impl FileNullifierRegistry {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join(REGISTRY_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating registry dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn record_path(&self, nullifier: &Nullifier) -> PathBuf {
        self.dir.join(nullifier.to_hex())
    }

    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.dir).map(|d| d.count()).unwrap_or(0)
    }
}

#[async_trait]
impl NullifierRegistry for FileNullifierRegistry {
    async fn try_consume(&self, nullifier: &Nullifier) -> Result<bool, RegistryError> {
        use std::io::Write;

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.record_path(nullifier))
        {
            Ok(mut file) => {
                file.write_all(Utc::now().to_rfc3339().as_bytes())
                    .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(RegistryError::Unavailable(e.to_string())),
        }
    }

    async fn is_consumed(&self, nullifier: &Nullifier) -> Result<bool, RegistryError> {
        self.record_path(nullifier)
            .try_exists()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }

    async fn consumed_at(
        &self,
        nullifier: &Nullifier,
    ) -> Result<Option<DateTime<Utc>>, RegistryError> {
        match std::fs::read_to_string(self.record_path(nullifier)) {
            Ok(stamp) => {
                let parsed = DateTime::parse_from_rfc3339(stamp.trim())
                    .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RegistryError::Unavailable(e.to_string())),
        }
    }
}

/// Issued-proof archive persisted as a JSON map keyed by proof id.
#[derive(Default, Serialize, Deserialize)]
pub struct FileProofArchive {
    proofs: HashMap<String, ArchivedEntry>,
}

#[derive(Serialize, Deserialize)]
pub struct ArchivedEntry {
    pub token: ProofToken,
    pub recorded_at: DateTime<Utc>,
}

impl FileProofArchive {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(ARCHIVE_FILE);
        if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&json)
                .with_context(|| format!("parsing {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(data_dir.join(ARCHIVE_FILE), json)?;
        Ok(())
    }

    /// Append-only insert; re-recording an id is rejected.
    pub fn record(&mut self, token: ProofToken) -> Result<()> {
        let id = token.proof_id.to_string();
        if self.proofs.contains_key(&id) {
            anyhow::bail!("proof {id} already recorded");
        }
        self.proofs.insert(
            id,
            ArchivedEntry {
                token,
                recorded_at: Utc::now(),
            },
        );
        Ok(())
    }

    pub fn get(&self, proof_id: &str) -> Option<&ArchivedEntry> {
        self.proofs.get(proof_id)
    }

    pub fn len(&self) -> usize {
        self.proofs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofpass_core::CredentialAttributes;

    #[test]
    fn test_wallet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new();
        let id = store
            .create_credential(CredentialAttributes::new("Alice", "age"), None)
            .unwrap()
            .id
            .clone();
        save_wallet(dir.path(), &store).unwrap();

        let reloaded = load_wallet(dir.path()).unwrap();
        assert!(reloaded.get(&id).is_some());
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_registry_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let n = Nullifier::from_bytes([1u8; 32]);

        let registry = FileNullifierRegistry::open(dir.path()).unwrap();
        assert!(registry.try_consume(&n).await.unwrap());

        // Restart: consumption state must persist.
        let reopened = FileNullifierRegistry::open(dir.path()).unwrap();
        assert!(!reopened.try_consume(&n).await.unwrap());
        assert!(reopened.is_consumed(&n).await.unwrap());
        assert!(reopened.consumed_at(&n).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_registry_single_winner_across_handles() {
        // Two independent handles over one data dir model two concurrent
        // CLI invocations racing on the same nullifier: create-new admits
        // exactly one winner.
        let dir = tempfile::tempdir().unwrap();
        let n = Nullifier::from_bytes([2u8; 32]);

        let a = FileNullifierRegistry::open(dir.path()).unwrap();
        let b = FileNullifierRegistry::open(dir.path()).unwrap();

        let (ra, rb) = tokio::join!(a.try_consume(&n), b.try_consume(&n));
        let winners = [ra.unwrap(), rb.unwrap()].iter().filter(|w| **w).count();
        assert_eq!(winners, 1);
        assert!(b.is_consumed(&n).await.unwrap());
    }
}

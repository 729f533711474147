//! Credential subcommands

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use proofpass_core::{CredentialAttributes, CredentialId};

use crate::state;

pub fn create(
    data_dir: &Path,
    name: String,
    credential_type: String,
    issuer: Option<String>,
    date_issued: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let date_issued = date_issued
        .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
        .transpose()
        .context("date must be YYYY-MM-DD")?;

    let attributes = CredentialAttributes {
        name,
        credential_type,
        issuer,
        date_issued,
        notes,
        ..Default::default()
    };

    let mut store = state::load_wallet(data_dir)?;
    let credential = store.create_credential(attributes, None)?;
    let id = credential.id.clone();
    let commitments = credential.commitments();
    state::save_wallet(data_dir, &store)?;

    println!("Credential created");
    println!("  id:                {}", id);
    println!("  payload commitment: {}", commitments.payload_commitment);
    println!("  issuer commitment:  {}", commitments.issuer_commitment);
    println!("  schema commitment:  {}", commitments.schema_commitment);
    Ok(())
}

pub fn list(data_dir: &Path) -> Result<()> {
    let store = state::load_wallet(data_dir)?;
    let mut credentials = store.list();
    credentials.sort_by_key(|c| c.created_at);

    if credentials.is_empty() {
        println!("No credentials stored.");
        return Ok(());
    }
    for credential in credentials {
        println!(
            "{}  {:<24} {:<12} {}",
            credential.id,
            credential.attributes.name,
            credential.attributes.credential_type,
            credential.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub fn show(data_dir: &Path, id: &str) -> Result<()> {
    let store = state::load_wallet(data_dir)?;
    let id = parse_credential_id(id)?;
    let Some(credential) = store.get(&id) else {
        bail!("no credential with id {id}");
    };

    println!("Credential {}", credential.id);
    println!("  name:     {}", credential.attributes.name);
    println!("  type:     {}", credential.attributes.credential_type);
    if let Some(issuer) = &credential.attributes.issuer {
        println!("  issuer:   {}", issuer);
    }
    println!("  created:  {}", credential.created_at);
    let commitments = credential.commitments();
    println!("  payload commitment: {}", commitments.payload_commitment);
    println!("  issuer commitment:  {}", commitments.issuer_commitment);
    println!("  schema commitment:  {}", commitments.schema_commitment);
    Ok(())
}

pub fn remove(data_dir: &Path, id: &str) -> Result<()> {
    let mut store = state::load_wallet(data_dir)?;
    let id = parse_credential_id(id)?;
    if store.remove(&id).is_none() {
        bail!("no credential with id {id}");
    }
    state::save_wallet(data_dir, &store)?;
    println!("Credential {id} removed.");
    Ok(())
}

pub(crate) fn parse_credential_id(hex_id: &str) -> Result<CredentialId> {
    let bytes = hex::decode(hex_id).context("credential id must be hex")?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("credential id must be 32 bytes of hex"))?;
    Ok(CredentialId::from_bytes(bytes))
}

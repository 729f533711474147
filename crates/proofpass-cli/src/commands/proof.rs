//! Proof subcommands

use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::path::Path;
use std::sync::Arc;

use proofpass_core::{ProofStatus, ProofToken, Verdict};
use proofpass_issuer::{IssuerPolicy, ProofIssuer};
use proofpass_registry::NullifierRegistry;
use proofpass_verifier::VerificationEngine;

use crate::state::{self, FileNullifierRegistry, FileProofArchive};
use crate::commands::credential::parse_credential_id;

pub async fn issue(
    data_dir: &Path,
    credential_id: &str,
    purpose: &str,
    recipient: &str,
    ttl: &str,
    one_time_use: bool,
) -> Result<()> {
    let store = state::load_wallet(data_dir)?;
    let id = parse_credential_id(credential_id)?;
    let Some(credential) = store.get(&id) else {
        bail!("no credential with id {id}");
    };

    let ttl = parse_ttl(ttl)?;
    let issuer = ProofIssuer::new(IssuerPolicy::default());
    let token = issuer.issue_proof(credential, purpose, recipient, ttl, one_time_use)?;

    let mut archive = FileProofArchive::load(data_dir)?;
    archive.record(token.clone())?;
    archive.save(data_dir)?;

    println!("Proof issued");
    println!("  proof id:  {}", token.proof_id);
    println!("  purpose:   {}", token.purpose);
    println!("  recipient: {}", token.recipient);
    println!("  expires:   {}", token.expires_at);
    println!("  one-time:  {}", token.one_time_use);
    println!();
    println!("Token (hand this to the verifier):");
    println!("{}", token.encode());
    Ok(())
}

pub async fn verify(data_dir: &Path, token_arg: &str, recipient: &str) -> Result<()> {
    let encoded = if let Some(path) = token_arg.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("reading token file {path}"))?
    } else {
        token_arg.to_string()
    };
    let token = ProofToken::decode(&encoded).context("decoding proof token")?;

    let registry: Arc<dyn NullifierRegistry> = Arc::new(FileNullifierRegistry::open(data_dir)?);
    let engine = VerificationEngine::new(registry);

    let verdict = engine.verify(&token, recipient).await?;

    match &verdict {
        Verdict::Valid(disclosure) => {
            println!("VALID");
            println!("  purpose:  {}", disclosure.purpose);
            println!("  window:   {} .. {}", disclosure.issued_at, disclosure.expires_at);
            println!("  one-time: {}", disclosure.one_time_use);
        }
        Verdict::Invalid(reason) => println!("INVALID: {reason}"),
        Verdict::Expired => println!("EXPIRED"),
        Verdict::AlreadyUsed => println!("ALREADY USED"),
    }
    Ok(())
}

pub async fn status(data_dir: &Path, proof_id: &str) -> Result<()> {
    let archive = FileProofArchive::load(data_dir)?;
    let Some(entry) = archive.get(proof_id) else {
        bail!("no proof recorded under id {proof_id}");
    };

    let registry = FileNullifierRegistry::open(data_dir)?;
    let token = &entry.token;

    // Status is a view over (expiry, consumption), never stored.
    let status = if token.one_time_use && registry.is_consumed(&token.nullifier).await? {
        ProofStatus::Used
    } else if token.is_expired_at(chrono::Utc::now()) {
        ProofStatus::Expired
    } else {
        ProofStatus::Active
    };

    println!("Proof {}", token.proof_id);
    println!("  status:    {}", status);
    println!("  purpose:   {}", token.purpose);
    println!("  recipient: {}", token.recipient);
    println!("  issued:    {}", token.issued_at);
    println!("  expires:   {}", token.expires_at);
    println!("  one-time:  {}", token.one_time_use);
    Ok(())
}

/// Parse a validity window like "30s", "10m", "1h", "24h", "7d".
fn parse_ttl(input: &str) -> Result<Duration> {
    let mut chars = input.trim().chars();
    let unit = chars
        .next_back()
        .context("ttl must look like 10m, 1h, 24h")?;
    let value: i64 = chars
        .as_str()
        .parse()
        .context("ttl must look like 10m, 1h, 24h")?;
    let duration = match unit {
        's' => Duration::seconds(value),
        'm' => Duration::minutes(value),
        'h' => Duration::hours(value),
        'd' => Duration::days(value),
        _ => bail!("ttl unit must be one of s, m, h, d"),
    };
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("10m").unwrap(), Duration::minutes(10));
        assert_eq!(parse_ttl("1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_ttl("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_ttl("30s").unwrap(), Duration::seconds(30));
        assert!(parse_ttl("oops").is_err());
        assert!(parse_ttl("10w").is_err());
    }

    #[test]
    fn test_parse_ttl_non_ascii_unit() {
        // A multi-byte final character must be a parse error, not a panic.
        assert!(parse_ttl("1µ").is_err());
        assert!(parse_ttl("µ").is_err());
        assert!(parse_ttl("").is_err());
    }
}

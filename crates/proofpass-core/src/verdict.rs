//! Verification verdicts and status views
//!
//! `Expired` and `AlreadyUsed` are legitimate terminal outcomes, not errors:
//! a verifier must be able to tell "legitimate holder replaying" apart from
//! "forged token". Infrastructure failures never appear here; they surface
//! as errors on the verification call itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a proof was rejected as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Required fields missing or ill-shaped
    Malformed,

    /// Minted for a different verifying party
    WrongRecipient,

    /// Cryptographic binding did not verify
    BadProof,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvalidReason::Malformed => "malformed",
            InvalidReason::WrongRecipient => "wrong recipient",
            InvalidReason::BadProof => "bad proof",
        };
        f.write_str(s)
    }
}

/// What a successful verification discloses to the verifier.
///
/// This is everything the verifier learns: the verdict plus the fields the
/// prover chose to share. Attributes and the holder secret are never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    pub purpose: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub one_time_use: bool,
}

/// Outcome of verifying a presented proof token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum Verdict {
    /// All checks passed; for one-time proofs the nullifier is now consumed.
    Valid(Disclosure),

    /// Structural or cryptographic failure; fatal for this token.
    Invalid(InvalidReason),

    /// Past its validity window.
    Expired,

    /// One-time proof whose nullifier was already consumed.
    AlreadyUsed,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }
}

/// Point-in-time status of an issued proof.
///
/// A view recomputed from `(expires_at, registry state)`; never stored, so
/// it cannot drift from the sources of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofStatus {
    /// Within its validity window and not consumed
    Active,

    /// Nullifier consumed (wins over expiry: a proof cannot be un-consumed
    /// by later expiring)
    Used,

    /// Past its validity window, never consumed
    Expired,
}

impl std::fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProofStatus::Active => "active",
            ProofStatus::Used => "used",
            ProofStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

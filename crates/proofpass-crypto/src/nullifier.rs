//! Nullifier derivation
//!
//! A nullifier uniquely identifies "this proof, from this credential, for
//! this purpose and recipient" while staying unlinkable to the credential
//! commitment. Derivation is keyed BLAKE3 with the holder secret as the
//! key, so it is one-way and immune to length-extension; the input fields
//! are length-prefixed so no two distinct (proof_id, purpose, recipient)
//! triples share an encoding.

use proofpass_core::{HolderSecret, Nullifier, ProofId};

use crate::canonical::put_field;

/// Derive the nullifier for a proof: `KDF(secret, proof_id, purpose, recipient)`.
pub fn derive_nullifier(
    secret: &HolderSecret,
    proof_id: &ProofId,
    purpose: &str,
    recipient: &str,
) -> Nullifier {
    let mut input = Vec::with_capacity(96);
    input.extend_from_slice(b"proofpass.nullifier.v1");
    put_field(&mut input, proof_id.as_str().as_bytes());
    put_field(&mut input, purpose.as_bytes());
    put_field(&mut input, recipient.as_bytes());

    let hash = blake3::keyed_hash(secret.as_bytes(), &input);
    Nullifier::from_bytes(*hash.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(byte: u8) -> HolderSecret {
        HolderSecret::from_bytes([byte; 32])
    }

    #[test]
    fn test_nullifier_deterministic() {
        let id = ProofId::generate();
        let a = derive_nullifier(&secret(1), &id, "bar-entry", "VenueX");
        let b = derive_nullifier(&secret(1), &id, "bar-entry", "VenueX");
        assert_eq!(a, b);
    }

    #[test]
    fn test_nullifier_differs_per_parameter() {
        let id = ProofId::generate();
        let base = derive_nullifier(&secret(1), &id, "bar-entry", "VenueX");

        assert_ne!(base, derive_nullifier(&secret(2), &id, "bar-entry", "VenueX"));
        assert_ne!(
            base,
            derive_nullifier(&secret(1), &ProofId::generate(), "bar-entry", "VenueX")
        );
        assert_ne!(base, derive_nullifier(&secret(1), &id, "job", "VenueX"));
        assert_ne!(base, derive_nullifier(&secret(1), &id, "bar-entry", "VenueY"));
    }

    #[test]
    fn test_nullifier_field_boundaries() {
        // Shifting a byte between purpose and recipient must change the output.
        let id = ProofId::generate();
        let a = derive_nullifier(&secret(1), &id, "ab", "c");
        let b = derive_nullifier(&secret(1), &id, "a", "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_nullifier_unlinkable_to_commitment() {
        // The nullifier is derived only from the keyed KDF; it never equals a
        // plain hash of its public inputs (the secret is required).
        let id = ProofId::generate();
        let n = derive_nullifier(&secret(1), &id, "bar-entry", "VenueX");
        let plain = blake3::hash(id.as_str().as_bytes());
        assert_ne!(n.as_bytes(), plain.as_bytes());
    }
}

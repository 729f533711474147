//! ProofPass Crypto
//!
//! Cryptographic primitives for the ProofPass proof engine: the commitment
//! engine (SHA3-256), canonical attribute encoding, holder secret
//! generation, the nullifier KDF, and the proof-material binding (keyed
//! BLAKE3).

pub mod binding;
pub mod canonical;
pub mod commit;
pub mod nullifier;
pub mod secret;

pub use binding::{binding_tag, derive_binding_key, verify_binding, BindingFields};
pub use canonical::canonical_attribute_bytes;
pub use commit::{commit, commit_str, CommitError, MAX_COMMIT_INPUT};
pub use nullifier::derive_nullifier;
pub use secret::generate_secret;

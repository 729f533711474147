//! Holder secret generation

use proofpass_core::HolderSecret;
use rand::RngCore;

/// Generate a fresh 32-byte holder secret from the thread-local CSPRNG.
pub fn generate_secret() -> HolderSecret {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    HolderSecret::from_bytes(bytes)
}

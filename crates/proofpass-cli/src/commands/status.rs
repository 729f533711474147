//! Status subcommand

use anyhow::Result;
use std::path::Path;

use crate::state::{self, FileNullifierRegistry, FileProofArchive};

pub fn show(data_dir: &Path) -> Result<()> {
    let wallet = state::load_wallet(data_dir)?;
    let registry = FileNullifierRegistry::open(data_dir)?;
    let archive = FileProofArchive::load(data_dir)?;

    println!("ProofPass data dir: {}", data_dir.display());
    println!("  credentials:         {}", wallet.len());
    println!("  proofs issued:       {}", archive.len());
    println!("  nullifiers consumed: {}", registry.len());
    Ok(())
}

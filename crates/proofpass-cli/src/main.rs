//! ProofPass CLI
//!
//! Command-line boundary for the ProofPass proof engine: create credentials,
//! issue purpose-bound proofs, verify presented tokens, and query proof
//! status. State lives as JSON files under the data directory.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod state;

#[derive(Parser)]
#[command(name = "proofpass")]
#[command(author, version, about = "ProofPass: privacy-preserving credential proofs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory for wallet, registry, and proof archive files
    #[arg(long, global = true, env = "PROOFPASS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Credential operations
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },

    /// Issue, verify, and inspect proofs
    Proof {
        #[command(subcommand)]
        action: ProofAction,
    },

    /// Show wallet and registry counts
    Status,
}

#[derive(Subcommand)]
enum CredentialAction {
    /// Create a credential from attributes
    Create {
        /// Display name, e.g. "Bachelor of Computer Science"
        #[arg(short, long)]
        name: String,

        /// Credential type, e.g. "degree"
        #[arg(short = 't', long)]
        credential_type: String,

        /// Issuing party
        #[arg(short, long)]
        issuer: Option<String>,

        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date_issued: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List stored credentials
    List,

    /// Show a credential's commitments
    Show {
        /// Credential id (hex)
        id: String,
    },

    /// Remove a credential from the wallet
    Remove {
        /// Credential id (hex)
        id: String,
    },
}

#[derive(Subcommand)]
enum ProofAction {
    /// Issue a purpose-bound proof from a credential
    Issue {
        /// Credential id (hex)
        #[arg(short, long)]
        credential: String,

        /// Use context, e.g. "job", "scholarship", "exam", "bar-entry"
        #[arg(short, long)]
        purpose: String,

        /// Intended verifying party
        #[arg(short, long)]
        recipient: String,

        /// Validity window, e.g. "10m", "1h", "24h"
        #[arg(long, default_value = "1h")]
        ttl: String,

        /// Allow repeated verification instead of one-time use
        #[arg(long)]
        reusable: bool,
    },

    /// Verify an encoded proof token
    Verify {
        /// Base64 token, or @path to a file containing one
        token: String,

        /// Identity of the verifying party
        #[arg(short, long)]
        recipient: String,
    },

    /// Show the current status of an issued proof
    Status {
        /// Proof id
        proof_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("proofpass={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = state::resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Commands::Credential { action } => match action {
            CredentialAction::Create {
                name,
                credential_type,
                issuer,
                date_issued,
                notes,
            } => {
                commands::credential::create(
                    &data_dir,
                    name,
                    credential_type,
                    issuer,
                    date_issued,
                    notes,
                )?;
            }
            CredentialAction::List => commands::credential::list(&data_dir)?,
            CredentialAction::Show { id } => commands::credential::show(&data_dir, &id)?,
            CredentialAction::Remove { id } => commands::credential::remove(&data_dir, &id)?,
        },
        Commands::Proof { action } => match action {
            ProofAction::Issue {
                credential,
                purpose,
                recipient,
                ttl,
                reusable,
            } => {
                commands::proof::issue(&data_dir, &credential, &purpose, &recipient, &ttl, !reusable)
                    .await?;
            }
            ProofAction::Verify { token, recipient } => {
                commands::proof::verify(&data_dir, &token, &recipient).await?;
            }
            ProofAction::Status { proof_id } => {
                commands::proof::status(&data_dir, &proof_id).await?;
            }
        },
        Commands::Status => {
            commands::status::show(&data_dir)?;
        }
    }

    Ok(())
}

//! ProofPass Database
//!
//! PostgreSQL persistence for the two facts the engine must keep across
//! restarts: consumed nullifiers (unique index, shared and consistent) and
//! the append-only proof audit log. Losing nullifier state would reset
//! consumption on restart and break the one-time-use guarantee, so this
//! backend exists even though the rest of the engine is pure computation.

pub mod pool;
pub mod repos;

pub use pool::{DatabaseConfig, DatabasePool};
pub use repos::{PgNullifierRegistry, PgProofArchive};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

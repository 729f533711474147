//! Database connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::{DbError, Result};

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of idle connections
    pub min_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/proofpass".to_string()),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            url: std::env::var("DATABASE_URL").unwrap_or(default.url),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.min_connections),
            connect_timeout: default.connect_timeout,
        }
    }
}

/// Database pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool with the given configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        info!("database connection pool established");
        Ok(Self { pool })
    }

    /// Create a pool from environment variables
    pub async fn from_env() -> Result<Self> {
        Self::new(&DatabaseConfig::from_env()).await
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Query(e.into()))?;
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<bool> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(DbError::Query)
    }

    /// Close the pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection pool closed");
    }
}

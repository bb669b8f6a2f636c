//! Storage lifecycle.
//!
//! The store is opened once at startup and closed once after the HTTP server
//! has drained. Everything else receives it through [`Repository`].

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Process-wide storage handle
pub enum Storage {
    Postgres(PgPool),
    Memory(Repository),
}

impl Storage {
    /// Connect to the configured store and bring its schema up to date
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            tracing::warn!("Using in-memory book storage, data will not survive a restart");
            return Ok(Storage::Memory(Repository::in_memory()));
        }

        let pool = connect(config).await?;
        tracing::info!("Connected to database");

        migrate(&pool).await?;
        tracing::info!("Database migrations completed");

        Ok(Storage::Postgres(pool))
    }

    /// Repository over this store
    pub fn repository(&self) -> Repository {
        match self {
            Storage::Postgres(pool) => Repository::postgres(pool.clone()),
            Storage::Memory(repository) => repository.clone(),
        }
    }

    /// Release pooled connections
    pub async fn close(self) {
        if let Storage::Postgres(pool) = self {
            pool.close().await;
            tracing::info!("Database connections closed");
        }
    }
}

/// Create the PostgreSQL connection pool
pub async fn connect(config: &DatabaseConfig) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;
    Ok(pool)
}

/// Run embedded migrations
pub async fn migrate(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))
}

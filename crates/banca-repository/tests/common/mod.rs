//! Common test infrastructure for database integration tests.

use banca_config::DatabaseConfig;
use banca_repository::{DatabasePool, DatabasePoolInterface};
use std::sync::Arc;

/// In-memory SQLite database wrapper for integration tests.
///
/// Uses a single pooled connection so every query sees the same in-memory
/// database; migrations run automatically.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a fresh in-memory database with migrations applied.
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 600,
        };

        let pool = DatabasePool::connect(&config)
            .await
            .expect("Failed to open in-memory SQLite database");

        let pool = Arc::new(pool);
        DatabasePoolInterface::run_migrations(pool.as_ref())
            .await
            .expect("Failed to run migrations");

        Self { pool }
    }

    /// Returns the pool as a trait object for repository construction.
    pub fn pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.pool.clone()
    }
}

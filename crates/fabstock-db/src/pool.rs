//! # Pool & Handle
//!
//! Opens the workshop's SQLite file, applies migrations and hands out
//! repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig { path, max_connections, acquire_timeout, migrate }           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new ──► SqlitePool (WAL, foreign_keys=ON)                    │
//! │       │                 │                                               │
//! │       │                 └── migrations::run_migrations                  │
//! │       ▼                                                                 │
//! │  db.raw_materials() / db.movements() / db.finished_products()           │
//! │  db.suppliers()     / db.orders()                                       │
//! │       (each accessor clones the pool into a fresh repository)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases use WAL so dashboard reads never wait on a stock
//! adjustment. `:memory:` is private to one connection, so the in-memory
//! configuration pins the pool to a single connection that never expires.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{
    FinishedProductRepository, ManufacturingOrderRepository, MovementRepository,
    RawMaterialRepository, SupplierRepository,
};

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives and how many connections it may open.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/fabstock/fabstock.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file (created on first open) or `:memory:`.
    pub path: PathBuf,

    /// Pool ceiling. One workshop and a few browsers: 5 by default.
    pub max_connections: u32,

    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,

    /// Apply pending migrations before returning the handle.
    pub migrate: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Isolated store for tests and the `:memory:` config value.
    pub fn in_memory() -> Self {
        DbConfig {
            path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == Path::new(IN_MEMORY_PATH)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle over the pool. Clones share the same connections, so the
/// API state keeps one and every service holds a clone.
///
/// ```rust,ignore
/// let alerts = db.raw_materials().list_active().await?;
/// let order = db.orders().get_by_id(&id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `config` and, unless disabled, migrates
    /// the schema.
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - the file could not be opened
    /// * `Err(DbError::MigrationFailed)` - a migration was rejected
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening stock database");

        let options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };
        // Off by default in SQLite; movements and orders rely on it
        let options = options.foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        if config.is_in_memory() {
            pool_options = pool_options.min_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.migrate {
            migrations::run_migrations(&db.pool).await?;
        }
        Ok(db)
    }

    /// Underlying pool, for transactions spanning repositories and for
    /// diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Balances and catalog data of raw materials.
    pub fn raw_materials(&self) -> RawMaterialRepository {
        RawMaterialRepository::new(self.pool.clone())
    }

    /// Append-only stock movement log.
    pub fn movements(&self) -> MovementRepository {
        MovementRepository::new(self.pool.clone())
    }

    pub fn finished_products(&self) -> FinishedProductRepository {
        FinishedProductRepository::new(self.pool.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    /// Manufacturing orders (OF).
    pub fn orders(&self) -> ManufacturingOrderRepository {
        ManufacturingOrderRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        info!("Closing stock database");
        self.pool.close().await;
    }

    /// `SELECT 1` round trip.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert!(total > 0);
        assert_eq!(total, applied);
    }

    #[test]
    fn test_config_paths() {
        let config = DbConfig::new("/tmp/fabstock-test.db").max_connections(0);
        assert_eq!(config.max_connections, 1);
        assert!(!config.is_in_memory());

        assert!(DbConfig::in_memory().is_in_memory());
        assert!(DbConfig::new(":memory:").is_in_memory());
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }
}

//! # Database Connection Module
//!
//! Provides the SQLite connection pool and the process-wide shared
//! gateway handle.
//!
//! ## Features
//!
//! - **WAL Mode**: Enabled for better concurrency (multiple readers, one writer)
//! - **Foreign Keys**: Enforced for referential integrity
//! - **Automatic Migrations**: Additive, embedded, run on open
//! - **Shared Open**: Concurrent first callers share a single in-flight
//!   open attempt; exactly one schema-creation pass runs per process
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_library::db::{DatabaseConfig, Library};
//!
//! // Explicit handle (tests, tools)
//! let library = Library::open(DatabaseConfig::new("tunepocket.db")).await?;
//!
//! // Process-wide handle (application shell)
//! Library::configure_shared(DatabaseConfig::new("tunepocket.db"));
//! let library = Library::shared().await?;
//! let songs = library.songs().find_all().await?;
//! ```
//!
//! The shared handle deliberately has no teardown: it is created on first
//! use and lives for the rest of the session.

use crate::error::{LibraryError, Result};
use crate::repositories::{SqlitePlaylistRepository, SqliteSongRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Database configuration for the SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file path or `:memory:` for an in-memory database
    pub database_url: String,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,

    /// Prepared statement cache capacity per connection
    pub statement_cache_capacity: usize,
}

impl DatabaseConfig {
    /// Create a configuration for the given database file path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        let database_url = format!("sqlite:{}", path.display());

        Self {
            database_url,
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            statement_cache_capacity: 100,
        }
    }

    /// Create a configuration for an in-memory database (useful for testing)
    ///
    /// A single connection is used so every caller observes the same
    /// in-memory schema.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            statement_cache_capacity: 100,
        }
    }

    /// Set the minimum number of connections
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the maximum number of connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection acquire timeout
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Set the statement cache capacity
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a configured SQLite connection pool
///
/// Configures connection options, creates the pool, runs the embedded
/// migrations, and health-checks the result.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, migrations fail to
/// apply, or the health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool> {
    info!(
        database_url = %config.database_url,
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        "Opening library database"
    );

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(LibraryError::Database)?
        // WAL for concurrent readers during imports
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        // Membership rows reference songs and playlists
        .foreign_keys(true)
        .create_if_missing(true)
        .statement_cache_capacity(config.statement_cache_capacity);

    debug!("SQLite connection options configured");

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to open library database");
            LibraryError::Database(e)
        })?;

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    Ok(pool)
}

/// Create a pool for testing with an in-memory database
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_pool(DatabaseConfig::in_memory()).await
}

/// Run database migrations
///
/// Migrations are embedded in the binary at compile time and are strictly
/// additive: upgrading a songs-only installation creates the playlist
/// tables without touching existing song rows.
async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running library migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Migration failed");
            LibraryError::Migration(e.to_string())
        })?;

    Ok(())
}

/// Verify the database is reachable through the pool
async fn health_check(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        LibraryError::Database(e)
    })?;

    Ok(())
}

/// Configuration for the process-wide shared gateway, set once by the
/// application shell before first use.
static SHARED_CONFIG: OnceLock<DatabaseConfig> = OnceLock::new();

/// The shared pool. `OnceCell` gives the open sequence its lifecycle:
/// empty (uninitialized), initializing (every concurrent caller awaits the
/// same in-flight open), set (ready). A failed open leaves the cell empty
/// so a later call can retry.
static SHARED_POOL: OnceCell<SqlitePool> = OnceCell::const_new();

/// Gateway handle to the durable song/playlist store.
///
/// Cloning is cheap; all clones share the same underlying pool.
#[derive(Clone)]
pub struct Library {
    pool: SqlitePool,
}

impl Library {
    /// Wrap an already-opened pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a standalone library handle
    pub async fn open(config: DatabaseConfig) -> Result<Self> {
        Ok(Self::new(create_pool(config).await?))
    }

    /// Declare where the process-wide shared library lives.
    ///
    /// Returns `false` when a configuration was already registered; the
    /// first registration wins.
    pub fn configure_shared(config: DatabaseConfig) -> bool {
        SHARED_CONFIG.set(config).is_ok()
    }

    /// Obtain the process-wide shared library, opening it on first use.
    ///
    /// Concurrent callers before the first successful open all await the
    /// same attempt; the schema-creation pass runs at most once per
    /// process. Operations on the returned handle therefore never need a
    /// prior explicit open call.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::StorageUnavailable`] when no configuration has
    ///   been registered for this process
    /// - [`LibraryError::Database`] / [`LibraryError::Migration`] when the
    ///   underlying open fails; the next call retries
    pub async fn shared() -> Result<Self> {
        let pool = SHARED_POOL
            .get_or_try_init(|| async {
                let config = SHARED_CONFIG.get().cloned().ok_or_else(|| {
                    LibraryError::StorageUnavailable(
                        "no database location configured for this process; \
                         call Library::configure_shared first"
                            .to_string(),
                    )
                })?;
                create_pool(config).await
            })
            .await?;

        Ok(Self::new(pool.clone()))
    }

    /// Song repository bound to this handle
    pub fn songs(&self) -> SqliteSongRepository {
        SqliteSongRepository::new(self.pool.clone())
    }

    /// Playlist repository bound to this handle
    pub fn playlists(&self) -> SqlitePlaylistRepository {
        SqlitePlaylistRepository::new(self.pool.clone())
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SongRepository;

    #[tokio::test]
    async fn test_create_in_memory_pool() {
        let pool = create_pool(DatabaseConfig::in_memory()).await;
        assert!(pool.is_ok(), "Should create in-memory pool successfully");
    }

    #[tokio::test]
    async fn test_health_check() {
        let pool = create_test_pool().await.unwrap();
        let result = health_check(&pool).await;
        assert!(result.is_ok(), "Health check should pass");
    }

    #[tokio::test]
    async fn test_database_config_builder() {
        let config = DatabaseConfig::in_memory()
            .min_connections(2)
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(60))
            .statement_cache_capacity(200);

        assert_eq!(config.min_connections, 2);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
        assert_eq!(config.statement_cache_capacity, 200);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_test_pool().await.unwrap();

        let result: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result.0, 1, "Foreign keys should be enabled");
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let pool = create_test_pool().await.unwrap();

        for table in ["songs", "playlists", "playlist_songs"] {
            let result: (i32,) = sqlx::query_as(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();

            assert_eq!(result.0, 1, "Table {} should exist", table);
        }
    }

    #[tokio::test]
    async fn test_shared_open_is_concurrency_safe() {
        // First registration wins; repeat registrations are rejected but
        // harmless, so this test is independent of execution order.
        Library::configure_shared(DatabaseConfig::in_memory());
        Library::configure_shared(DatabaseConfig::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|_| tokio::spawn(async { Library::shared().await }))
            .collect();

        let mut libraries = Vec::new();
        for handle in handles {
            libraries.push(handle.await.unwrap().expect("shared open should succeed"));
        }

        // Every caller resolved to a usable handle over the same store.
        for library in &libraries {
            library.songs().count().await.unwrap();
        }

        // One schema pass: the migrations ledger records each migration once.
        let applied: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(libraries[0].pool())
            .await
            .unwrap();
        assert_eq!(applied.0, 2);
    }
}

//! SQLite connection pool
//!
//! Thin wrapper over an r2d2/rusqlite pool that applies the connection
//! pragmas every handle needs and converts pool errors into domain errors.

use std::path::Path;
use std::time::Duration;

use docket_domain::Result;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::InfraError;

/// Pragmas applied to every pooled connection.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
    PRAGMA busy_timeout = 5000;
";

/// Pool sizing and timeout configuration.
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    pub max_size: u32,
    pub connection_timeout: Duration,
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self { max_size: 8, connection_timeout: Duration::from_secs(5) }
    }
}

/// Shared SQLite connection pool.
pub struct SqlitePool {
    inner: r2d2::Pool<SqliteConnectionManager>,
}

impl SqlitePool {
    /// Open (or create) the database at `path` and build the pool.
    pub fn open<P: AsRef<Path>>(path: P, config: SqlitePoolConfig) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

        let inner = r2d2::Pool::builder()
            .max_size(config.max_size.max(1))
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(InfraError::from)?;

        Ok(Self { inner })
    }

    /// Acquire a connection from the pool.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.inner.get().map_err(InfraError::from)?)
    }

    /// Configured maximum pool size.
    pub fn max_size(&self) -> u32 {
        self.inner.max_size()
    }
}

//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docket_domain::Result;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use super::pool::{SqlitePool, SqlitePoolConfig};
use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps a [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open the database at `db_path` with the given pool configuration.
    pub fn new<P: AsRef<Path>>(db_path: P, config: SqlitePoolConfig) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let pool = Arc::new(SqlitePool::open(&path, config)?);

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get()
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(InfraError::from)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at)
             VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Perform a health check to verify database connectivity.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(InfraError::from)?;
        Ok(())
    }
}

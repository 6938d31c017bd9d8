//! Database access helpers shared by query modules.
//!
//! This crate owns two things:
//! - [`DbHandle`]: a SeaORM connection built from a DSN plus typed pool options,
//!   with engine detection, credential redaction for logs and transaction scopes;
//! - [`condition`]: folding of filter terms into a `sea_orm::Condition`
//!   so that absent terms never reach the WHERE clause.
//!
//! # Example
//! ```rust,no_run
//! # async fn demo() -> query_db::Result<()> {
//! use query_db::{ConnectOpts, DbHandle};
//!
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let conn = db.sea();
//! # let _ = conn;
//! db.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod condition;

pub use condition::{conjunction, has_text, non_blank};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use thiserror::Error;
use tracing::{debug, info};

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Pool options; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to open a new connection.
    pub connect_timeout: Option<Duration>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Emit SQL statements through `tracing` (sqlx logging).
    pub sql_logging: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            connect_timeout: Some(Duration::from_secs(10)),
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            sql_logging: false,
        }
    }
}

/// Main handle.
#[derive(Debug, Clone)]
pub struct DbHandle {
    engine: DbEngine,
    dsn: String,
    sea: DatabaseConnection,
}

impl DbHandle {
    /// Detect engine by DSN scheme. The tail (credentials etc.) is left untouched.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(redact_credentials_in_dsn(Some(dsn))))
        }
    }

    /// Connect and build handle.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        ensure_engine_enabled(engine)?;

        let mut o = ConnectOptions::new(dsn.trim().to_owned());
        if engine == DbEngine::Sqlite && is_sqlite_memory(dsn) {
            // Each connection to an in-memory SQLite is a separate database:
            // pin the pool to one long-lived connection.
            o.max_connections(1).min_connections(1);
        } else {
            if let Some(n) = opts.max_conns {
                o.max_connections(n);
            }
            if let Some(n) = opts.min_conns {
                o.min_connections(n);
            }
        }
        if let Some(t) = opts.connect_timeout {
            o.connect_timeout(t);
        }
        if let Some(t) = opts.acquire_timeout {
            o.acquire_timeout(t);
        }
        if let Some(t) = opts.idle_timeout {
            o.idle_timeout(t);
        }
        o.sqlx_logging(opts.sql_logging);

        debug!(dsn = %redact_credentials_in_dsn(Some(dsn)), ?engine, "connecting");
        let sea = Database::connect(o).await?;
        info!(?engine, "database connection established");

        Ok(Self {
            engine,
            dsn: dsn.to_string(),
            sea,
        })
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Cloned SeaORM connection (cheap; shares the pool).
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }

    /// Borrowed SeaORM connection.
    pub fn seaorm(&self) -> &DatabaseConnection {
        &self.sea
    }

    /// Open a unit of work. The caller commits or rolls back; dropping it rolls back.
    pub async fn begin(&self) -> Result<DatabaseTransaction> {
        Ok(self.sea.begin().await?)
    }

    pub async fn close(self) -> Result<()> {
        self.sea.close().await?;
        Ok(())
    }
}

fn is_sqlite_memory(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

fn ensure_engine_enabled(engine: DbEngine) -> Result<()> {
    match engine {
        #[cfg(feature = "pg")]
        DbEngine::Postgres => Ok(()),
        #[cfg(not(feature = "pg"))]
        DbEngine::Postgres => Err(DbError::FeatureDisabled("pg")),
        #[cfg(feature = "sqlite")]
        DbEngine::Sqlite => Ok(()),
        #[cfg(not(feature = "sqlite"))]
        DbEngine::Sqlite => Err(DbError::FeatureDisabled("sqlite")),
    }
}

/// Replace the password in a DSN with `***` so it can be logged.
pub fn redact_credentials_in_dsn(dsn: Option<&str>) -> String {
    match dsn {
        Some(dsn) if dsn.contains('@') => {
            if let Ok(mut parsed) = url::Url::parse(dsn) {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            } else {
                "***".to_string()
            }
        }
        Some(dsn) => dsn.to_string(),
        None => "none".to_string(),
    }
}

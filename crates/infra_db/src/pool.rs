//! Database connection pool management
//!
//! Pool configuration and creation for PostgreSQL using SQLx. Tenant
//! isolation happens here: a configuration may pin a PostgreSQL schema, and
//! every connection handed out by the pool has its `search_path` set to that
//! tenant's schema, keeping the repositories tenant-agnostic.

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Configuration options for the database connection pool
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use infra_db::DatabaseConfig;
///
/// let config = DatabaseConfig::new("postgres://localhost/accounting")
///     .max_connections(20)
///     .connect_timeout(Duration::from_secs(10))
///     .tenant_schema("org_acme");
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
    /// Idle timeout before closing a connection
    pub idle_timeout: Duration,
    /// Schema every pooled connection is pinned to, one per tenant
    pub tenant_schema: Option<String>,
}

/// Environment settings recognized by [`DatabaseConfig::from_env`]
#[derive(Debug, Deserialize)]
struct EnvSettings {
    url: String,
    max_connections: Option<u32>,
    min_connections: Option<u32>,
    tenant_schema: Option<String>,
}

impl DatabaseConfig {
    /// Creates a new database configuration with the given connection URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60),
            idle_timeout: Duration::from_secs(10 * 60),
            tenant_schema: None,
        }
    }

    /// Loads configuration from `DATABASE_*` environment variables
    ///
    /// Reads a `.env` file when present. `DATABASE_URL` is required;
    /// `DATABASE_MAX_CONNECTIONS`, `DATABASE_MIN_CONNECTIONS` and
    /// `DATABASE_TENANT_SCHEMA` override the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when required settings are missing or fail to
    /// parse.
    pub fn from_env() -> Result<Self, DatabaseError> {
        dotenvy::dotenv().ok();

        let settings: EnvSettings = Config::builder()
            .add_source(Environment::with_prefix("DATABASE").try_parsing(true))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| DatabaseError::Configuration(e.to_string()))?;

        let mut config = Self::new(settings.url);
        if let Some(max) = settings.max_connections {
            config.max_connections = max;
        }
        if let Some(min) = settings.min_connections {
            config.min_connections = min;
        }
        config.tenant_schema = settings.tenant_schema;
        Ok(config)
    }

    /// Sets the maximum number of connections in the pool
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections to maintain
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout duration
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the maximum lifetime of a connection
    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Sets the idle timeout before closing a connection
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Pins every pooled connection to a tenant's schema
    pub fn tenant_schema(mut self, schema: impl Into<String>) -> Self {
        self.tenant_schema = Some(schema.into());
        self
    }
}

/// Creates a database connection pool with the given configuration
///
/// When a tenant schema is configured, each new connection runs
/// `SET search_path` before it joins the pool, so every query issued through
/// the pool operates inside that tenant's namespace.
///
/// # Errors
///
/// Returns `ConnectionFailed` if the pool cannot be created.
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        tenant_schema = config.tenant_schema.as_deref(),
        "creating database pool"
    );

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout);

    if let Some(schema) = config.tenant_schema.clone() {
        options = options.after_connect(move |conn, _meta| {
            let schema = schema.clone();
            Box::pin(async move {
                let stmt = format!("SET search_path TO {schema}, public");
                sqlx::query(&stmt).execute(&mut *conn).await?;
                Ok(())
            })
        });
    }

    let pool = options
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("database pool created");
    Ok(pool)
}

/// Creates a connection pool from a URL string with default settings
pub async fn create_pool_from_url(url: &str) -> Result<DatabasePool, DatabaseError> {
    create_pool(DatabaseConfig::new(url)).await
}

/// Applies the embedded migrations to the connected database
///
/// # Errors
///
/// Returns `MigrationFailed` when a migration cannot be applied.
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}

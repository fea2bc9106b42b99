//! Infrastructure Database Layer
//!
//! PostgreSQL adapter for the accounting core, built on SQLx. The domain
//! crates stay store-agnostic; this crate supplies the durable counterpart
//! to the in-memory engine with the same atomic-replace contract: a
//! document's ledger rows are deleted and re-inserted inside one database
//! transaction, so concurrent readers observe either the fully-old or the
//! fully-new row set.
//!
//! Multi-tenancy is handled at the pool layer: a [`DatabaseConfig`] may pin
//! a PostgreSQL schema per tenant, keeping the repositories tenant-agnostic.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, LedgerRepository};
//!
//! let config = DatabaseConfig::from_env()?;
//! let pool = create_pool(config).await?;
//! run_migrations(&pool).await?;
//! let ledger = LedgerRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{AccountRepository, LedgerRepository};

//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the claims engine:
//! connection pooling, schema application, repositories over the raw
//! tables, and adapters that implement the domain store ports.
//!
//! # Architecture
//!
//! Repositories speak in row structs and `DatabaseError`; adapters wrap
//! them, convert rows to domain aggregates, and translate failures into
//! `PortError` for the domain layer. Queries use the runtime-checked
//! sqlx API, so the crate builds without a database present.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool_from_url, apply_schema, PostgresClaimStore};
//!
//! let pool = create_pool_from_url(&database_url).await?;
//! apply_schema(&pool).await?;
//! let claims = PostgresClaimStore::new(pool.clone());
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{PostgresClaimStore, PostgresCustomerStore, PostgresPolicyStore};
pub use error::DatabaseError;
pub use pool::{apply_schema, create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};

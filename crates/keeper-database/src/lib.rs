//! # keeper-database
//!
//! PostgreSQL connection management, the migration runner, and repository
//! implementations of the `keeper-core` store traits. Also provides
//! in-memory stores for development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;

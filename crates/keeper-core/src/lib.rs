//! # keeper-core
//!
//! Core crate for Warranty Keeper. Contains the backend traits the
//! notification engine is written against, configuration schemas, typed
//! identifiers, warranty and preference value types, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Warranty Keeper crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

//! # keeper-entity
//!
//! Row models for the tables Warranty Keeper reads and writes. Every struct
//! derives `sqlx::FromRow`; rows owned by other services convert into
//! `keeper-core` domain values through `TryFrom`, validating as they go.

pub mod notification;
pub mod user;
pub mod warranty;

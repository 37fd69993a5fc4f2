//! Background processing for Warranty Keeper.
//!
//! This crate provides:
//! - The expiration scanner that selects candidates for a day
//! - A periodic scheduler with cancellation and graceful stop
//! - The expiration and gate-cleanup jobs
//! - Engine assembly from configuration

pub mod engine;
pub mod executor;
pub mod jobs;
pub mod scanner;
pub mod scheduler;

pub use engine::{EngineParts, NotifierEngine};
pub use executor::{JobExecutionError, ScheduledJob};
pub use scanner::ExpirationScanner;
pub use scheduler::PeriodicScheduler;

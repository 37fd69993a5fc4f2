//! Convenience result type alias for Warranty Keeper.

use crate::error::AppError;

/// A specialized `Result` type for Warranty Keeper operations.
pub type AppResult<T> = Result<T, AppError>;

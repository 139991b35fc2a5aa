//! Convenience result type alias for CourtHub.

use crate::error::AppError;

/// A specialized `Result` type for CourtHub operations.
pub type AppResult<T> = Result<T, AppError>;

//! Utilities: logging setup and error re-exports

pub mod logger;

// Error types come from shared so handlers and middleware agree on codes
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

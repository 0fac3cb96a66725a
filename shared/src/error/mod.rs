//! Unified error system for the cluster gateway
//!
//! This module provides the error handling system shared by every stage of
//! the gateway:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors (400/404)
//! - 1xxx: Authentication errors (400/401)
//! - 2xxx: Permission errors (403)
//! - 3xxx: License errors (401)
//! - 8xxx: Account errors
//! - 9xxx: System errors (500, message hidden from the caller)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::TokenNotFound);
//! let err = AppError::permission_denied("permission denied: GET /api/v1/users");
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

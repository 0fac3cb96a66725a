//! Shared types for the cluster gateway
//!
//! Types used by the gateway server and by API clients: the unified error
//! model, the permission/identity data model and the auth API DTOs.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Capability, DelegationRule, GlobalRole, License, Role, User};

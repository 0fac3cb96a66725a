//! Client-related types shared between the gateway and its API clients
//!
//! Request/response types used by the auth endpoints.

use serde::{Deserialize, Serialize};

use crate::models::User;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Standard login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token
    pub token: String,
    /// Human-readable expiry (RFC 3339)
    pub expires_at: String,
    /// Effective permission bitmask at issue time
    pub permission: u32,
    /// User record with the password cleared
    pub user: User,
}

/// Auth-type probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTypeResponse {
    /// Strategy used when the request carries no strategy header
    pub default: String,
    /// Strategies accepted by this deployment
    pub enabled: Vec<String>,
}

/// Domain discovery response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResponse {
    pub domain: String,
}

/// Current user response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub strategy: String,
    /// Effective permission (standard strategy only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<u32>,
}

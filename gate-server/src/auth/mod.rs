//! Authentication and authorization
//!
//! - [`AuthStrategy`] - per-request strategy selection
//! - [`TokenCodec`] - session token signing and verification
//! - [`CurrentUser`] - authenticated caller context
//! - [`permissions`] - capability bits and effective permission
//! - [`rules`] - delegation rule matching
//! - [`password`] - argon2 password hashing
//! - [`gate`] - the filter-chain middleware

pub mod delegated;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod rules;
pub mod standard;
pub mod strategy;
pub mod token;

pub use extractor::{CurrentUser, DELEGATED_USER_HEADER, TOKEN_PARAM};
pub use middleware::gate;
pub use strategy::{AUTH_TYPE_HEADER, AuthStrategy, UnknownAuthType};
pub use token::{SessionClaims, SessionConfig, TokenCodec, TokenError};

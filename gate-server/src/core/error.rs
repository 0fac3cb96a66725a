use thiserror::Error;

use crate::auth::TokenError;
use crate::routes::ExemptPatternError;

/// Startup and serving errors
///
/// Request-time failures are [`crate::AppError`]; everything here stops the
/// process before (or instead of) serving traffic.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("session signing key: {0}")]
    SigningKey(#[from] TokenError),

    #[error("exempt path: {0}")]
    ExemptPath(#[from] ExemptPatternError),

    #[error("identity client: {0}")]
    IdentityClient(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ServerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result alias for startup code
pub type Result<T> = std::result::Result<T, ServerError>;

//! Session token codec
//!
//! Signs and verifies the session tokens issued at standard login. The
//! signing material comes base64-encoded from configuration:
//!
//! | Algorithm family | `secret` decodes to | `verify_key` decodes to |
//! |------------------|---------------------|-------------------------|
//! | HS256/384/512 | raw HMAC secret | unused |
//! | RS*/PS* | RSA private key PEM | RSA public key PEM |
//! | ES256/384 | EC private key PEM | EC public key PEM |

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::User;
use thiserror::Error;

/// Longest session lifetime accepted from configuration (one year)
pub const MAX_SESSION_EXPIRY_HOURS: i64 = 24 * 366;

/// Session token settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base64 signing secret (HMAC) or private key PEM (RSA/EC)
    pub secret: String,
    /// Base64 public key PEM, required for asymmetric algorithms
    pub verify_key: Option<String>,
    pub algorithm: Algorithm,
    /// Session lifetime in hours
    pub expiry_hours: i64,
}

/// Claims carried by a session token
///
/// The embedded user is informational: its password is always empty and its
/// role capabilities are never used for authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: User,
    /// Expiry, unix seconds
    pub exp: i64,
    /// Issued at, unix seconds
    pub iat: i64,
}

impl SessionClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("signing key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    #[error("signing key rejected: {0}")]
    Key(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("session lifetime of {0} hours is out of range (1..={max})", max = MAX_SESSION_EXPIRY_HOURS)]
    Lifetime(i64),
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from configuration, decoding the key material
    pub fn from_config(config: &SessionConfig) -> Result<Self, TokenError> {
        if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&config.expiry_hours) {
            return Err(TokenError::Lifetime(config.expiry_hours));
        }
        let lifetime =
            Duration::try_hours(config.expiry_hours).ok_or(TokenError::Lifetime(config.expiry_hours))?;

        let secret = BASE64.decode(config.secret.trim())?;
        if secret.is_empty() {
            return Err(TokenError::Key("empty secret".into()));
        }

        let (encoding_key, decoding_key) = match config.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => (
                EncodingKey::from_secret(&secret),
                DecodingKey::from_secret(&secret),
            ),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => {
                let public = Self::verify_key(config)?;
                (
                    EncodingKey::from_rsa_pem(&secret).map_err(|e| TokenError::Key(e.to_string()))?,
                    DecodingKey::from_rsa_pem(&public).map_err(|e| TokenError::Key(e.to_string()))?,
                )
            }
            Algorithm::ES256 | Algorithm::ES384 => {
                let public = Self::verify_key(config)?;
                (
                    EncodingKey::from_ec_pem(&secret).map_err(|e| TokenError::Key(e.to_string()))?,
                    DecodingKey::from_ec_pem(&public).map_err(|e| TokenError::Key(e.to_string()))?,
                )
            }
            other => {
                return Err(TokenError::Key(format!("unsupported algorithm {other:?}")));
            }
        };

        Ok(Self {
            algorithm: config.algorithm,
            encoding_key,
            decoding_key,
            lifetime,
        })
    }

    fn verify_key(config: &SessionConfig) -> Result<Vec<u8>, TokenError> {
        let encoded = config.verify_key.as_deref().ok_or_else(|| {
            TokenError::Key(format!(
                "{:?} requires a verification public key",
                config.algorithm
            ))
        })?;
        Ok(BASE64.decode(encoded.trim())?)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Session lifetime applied by [`TokenCodec::issue`]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `user`, expiring `lifetime` from now
    ///
    /// The password is cleared before embedding.
    pub fn issue(&self, user: &User) -> Result<(String, SessionClaims), TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::GenerationFailed("expiry out of range".into()))?;
        let claims = SessionClaims {
            user: user.sanitized(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// Verify signature, algorithm and expiry
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::InvalidToken(e.to_string()),
            },
        )?;

        Ok(data.claims)
    }
}

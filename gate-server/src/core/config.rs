use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use jsonwebtoken::Algorithm;

use crate::auth::token::MAX_SESSION_EXPIRY_HOURS;
use crate::auth::{AuthStrategy, SessionConfig};
use crate::core::{Result, ServerError};
use crate::services::identity::DelegatedConfig;

/// Development-only signing secret, never accepted outside development
const DEV_SESSION_SECRET: &str = "dev-session-secret-not-for-production";

/// Gateway configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 8080 | listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | API_BASE_PATH | /api | route prefix |
/// | API_GROUP_VERSION | /v1 | route group version |
/// | GATEWAY_DOMAIN | localhost | value served by domain discovery |
/// | SESSION_SECRET | (dev only) | base64 signing secret or private key PEM |
/// | SESSION_VERIFY_KEY | - | base64 public key PEM for asymmetric algorithms |
/// | SESSION_ALGORITHM | HS256 | token signing algorithm |
/// | SESSION_EXPIRY_HOURS | 24 | session lifetime, 1..=8784 |
/// | AUTH_DEFAULT_STRATEGY | standard | strategy when no header is sent |
/// | AUTH_EXTRA_EXEMPT_PATHS | - | comma separated extra exempt patterns |
/// | DELEGATED_BASE_URL | - | identity platform base URL, enables `caas` |
/// | DELEGATED_TOKEN_URL | {base}/oauth/token | password-grant endpoint |
/// | DELEGATED_CLIENT_ID | - | client id sent with the password grant |
/// | DELEGATED_TIMEOUT_MS | 5000 | outbound request timeout |
/// | LOG_LEVEL | info | log filter |
/// | LOG_DIR | - | daily rolling log directory |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Route prefix, e.g. `/api`
    pub base_path: String,
    /// Route group version, e.g. `/v1`
    pub group_version: String,
    /// Domain reported by the discovery endpoint
    pub domain: String,
    /// Session token settings
    pub session: SessionConfig,
    /// Strategy used when a request carries no strategy header
    pub default_strategy: AuthStrategy,
    /// Extra exempt path patterns appended to the built-in list
    pub extra_exempt_paths: Vec<String>,
    /// Identity platform settings; `None` disables the delegated strategy
    pub delegated: Option<DelegatedConfig>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unknown strategy or algorithm names and malformed numbers are startup
    /// errors rather than silent defaults.
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let session = SessionConfig {
            secret: require_secret("SESSION_SECRET", &environment)?,
            verify_key: non_empty_var("SESSION_VERIFY_KEY"),
            algorithm: parse_algorithm(
                &std::env::var("SESSION_ALGORITHM").unwrap_or_else(|_| "HS256".into()),
            )?,
            expiry_hours: parse_var("SESSION_EXPIRY_HOURS", 24)?,
        };

        let default_strategy = match non_empty_var("AUTH_DEFAULT_STRATEGY") {
            Some(s) => AuthStrategy::from_str(&s).map_err(|e| ServerError::config(e.to_string()))?,
            None => AuthStrategy::Standard,
        };

        let delegated = match non_empty_var("DELEGATED_BASE_URL") {
            Some(base_url) => {
                let base_url = base_url.trim_end_matches('/').to_string();
                Some(DelegatedConfig {
                    token_url: non_empty_var("DELEGATED_TOKEN_URL")
                        .unwrap_or_else(|| format!("{base_url}/oauth/token")),
                    base_url,
                    client_id: non_empty_var("DELEGATED_CLIENT_ID"),
                    timeout_ms: parse_var("DELEGATED_TIMEOUT_MS", 5000)?,
                })
            }
            None => None,
        };

        let config = Self {
            http_port: parse_var("HTTP_PORT", 8080)?,
            environment,
            base_path: std::env::var("API_BASE_PATH").unwrap_or_else(|_| "/api".into()),
            group_version: std::env::var("API_GROUP_VERSION").unwrap_or_else(|_| "/v1".into()),
            domain: std::env::var("GATEWAY_DOMAIN").unwrap_or_else(|_| "localhost".into()),
            session,
            default_strategy,
            extra_exempt_paths: non_empty_var("AUTH_EXTRA_EXEMPT_PATHS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            delegated,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: non_empty_var("LOG_DIR"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration for local development and tests: standard strategy
    /// only, HS256 with the given raw secret.
    pub fn with_secret(secret: &[u8]) -> Self {
        Self {
            http_port: 8080,
            environment: "development".into(),
            base_path: "/api".into(),
            group_version: "/v1".into(),
            domain: "localhost".into(),
            session: SessionConfig {
                secret: BASE64.encode(secret),
                verify_key: None,
                algorithm: Algorithm::HS256,
                expiry_hours: 24,
            },
            default_strategy: AuthStrategy::Standard,
            extra_exempt_paths: Vec::new(),
            delegated: None,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// Range and cross-field checks
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&self.session.expiry_hours) {
            return Err(ServerError::config(format!(
                "SESSION_EXPIRY_HOURS must be between 1 and {MAX_SESSION_EXPIRY_HOURS}, got {}",
                self.session.expiry_hours
            )));
        }
        if self.default_strategy == AuthStrategy::Delegated && self.delegated.is_none() {
            return Err(ServerError::config(
                "AUTH_DEFAULT_STRATEGY=caas requires DELEGATED_BASE_URL",
            ));
        }
        Ok(())
    }

    /// Strategies this deployment accepts
    pub fn enabled_strategies(&self) -> Vec<AuthStrategy> {
        let mut enabled = vec![AuthStrategy::Standard];
        if self.delegated.is_some() {
            enabled.push(AuthStrategy::Delegated);
        }
        enabled
    }

    /// `base_path + group_version + path`
    pub fn api_path(&self, path: &str) -> String {
        crate::routes::registry::compose_path(&self.base_path, &self.group_version, path)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Require a secret env var: must be set and non-empty outside development
fn require_secret(name: &str, environment: &str) -> Result<String> {
    match non_empty_var(name) {
        Some(v) => Ok(v),
        None if environment == "development" => {
            tracing::warn!("{name} not set, using development secret");
            Ok(BASE64.encode(DEV_SESSION_SECRET))
        }
        None => Err(ServerError::config(format!(
            "{name} must be set in {environment} environment"
        ))),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match non_empty_var(name) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ServerError::config(format!("{name} has invalid value {v:?}"))),
        None => Ok(default),
    }
}

/// Accepted signing algorithms: HMAC, RSA, ECDSA and RSA-PSS variants
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    let algorithm = match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Algorithm::HS256,
        "HS384" => Algorithm::HS384,
        "HS512" => Algorithm::HS512,
        "RS256" => Algorithm::RS256,
        "RS384" => Algorithm::RS384,
        "RS512" => Algorithm::RS512,
        "ES256" => Algorithm::ES256,
        "ES384" => Algorithm::ES384,
        "PS256" => Algorithm::PS256,
        "PS384" => Algorithm::PS384,
        "PS512" => Algorithm::PS512,
        other => {
            return Err(ServerError::config(format!(
                "unsupported signing algorithm {other:?}"
            )));
        }
    };
    Ok(algorithm)
}

//! Strategy selection
//!
//! The `x-auth-type` header picks the trust model per request. An absent
//! header means the configured default; anything outside the enumerated set
//! is rejected instead of silently falling back.

use std::fmt;
use std::str::FromStr;

use http::HeaderMap;

use crate::AppError;
use crate::utils::ErrorCode;

/// Strategy selector header
pub const AUTH_TYPE_HEADER: &str = "x-auth-type";

/// Authentication strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStrategy {
    /// Locally signed session token + capability bitmask
    Standard,
    /// Identity platform decides (`caas`)
    Delegated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown auth type {0:?}, expected \"standard\" or \"caas\"")]
pub struct UnknownAuthType(pub String);

impl AuthStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Delegated => "caas",
        }
    }

    /// Resolve the strategy for a request
    ///
    /// - header absent or blank: `default`
    /// - header names a known but disabled strategy: 400
    /// - header unknown: 400
    pub fn select(
        headers: &HeaderMap,
        default: AuthStrategy,
        enabled: &[AuthStrategy],
    ) -> Result<AuthStrategy, AppError> {
        let raw = match headers.get(AUTH_TYPE_HEADER) {
            None => return Ok(default),
            Some(v) => v.to_str().map_err(|_| {
                AppError::with_message(ErrorCode::UnsupportedAuthType, "auth type header is not ASCII")
            })?,
        };
        if raw.trim().is_empty() {
            return Ok(default);
        }

        let strategy = raw
            .parse::<AuthStrategy>()
            .map_err(|e| AppError::with_message(ErrorCode::UnsupportedAuthType, e.to_string()))?;

        if !enabled.contains(&strategy) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedAuthType,
                format!("auth type {:?} is not enabled", strategy.as_str()),
            ));
        }
        Ok(strategy)
    }
}

impl FromStr for AuthStrategy {
    type Err = UnknownAuthType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "standard" => Ok(Self::Standard),
            "caas" => Ok(Self::Delegated),
            other => Err(UnknownAuthType(other.to_string())),
        }
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const BOTH: &[AuthStrategy] = &[AuthStrategy::Standard, AuthStrategy::Delegated];

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTH_TYPE_HEADER, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn test_absent_header_uses_default() {
        let selected = AuthStrategy::select(&HeaderMap::new(), AuthStrategy::Standard, BOTH);
        assert_eq!(selected.unwrap(), AuthStrategy::Standard);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(
            AuthStrategy::select(&headers("standard"), AuthStrategy::Delegated, BOTH).unwrap(),
            AuthStrategy::Standard
        );
        assert_eq!(
            AuthStrategy::select(&headers("caas"), AuthStrategy::Standard, BOTH).unwrap(),
            AuthStrategy::Delegated
        );
    }

    #[test]
    fn test_unknown_value_rejected() {
        let err = AuthStrategy::select(&headers("ldap"), AuthStrategy::Standard, BOTH).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedAuthType);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_disabled_strategy_rejected() {
        let err = AuthStrategy::select(
            &headers("caas"),
            AuthStrategy::Standard,
            &[AuthStrategy::Standard],
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedAuthType);
    }

    #[test]
    fn test_case_sensitive() {
        assert!("CAAS".parse::<AuthStrategy>().is_err());
    }
}

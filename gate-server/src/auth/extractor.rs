//! Credential extraction and the CurrentUser extractor
//!
//! Token sources, first non-empty wins:
//!
//! | Strategy | 1st | 2nd | 3rd |
//! |----------|-----|-----|-----|
//! | standard | `Authorization: Bearer` | `?token=` (base64) | cookie `token` |
//! | caas | `Authorization: Bearer` | cookie `token` | - |

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::{HeaderMap, Uri, header};
use shared::models::Capability;

use crate::AppError;
use crate::auth::AuthStrategy;

/// Cookie and query parameter carrying the session token
pub const TOKEN_PARAM: &str = "token";

/// Asserted username in delegated mode
pub const DELEGATED_USER_HEADER: &str = "x-auth-user";

/// Authenticated caller, inserted into request extensions by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub strategy: AuthStrategy,
    /// Effective permission at request time (standard strategy only)
    pub permission: Option<Capability>,
}

impl CurrentUser {
    pub fn standard(username: impl Into<String>, permission: Capability) -> Self {
        Self {
            username: username.into(),
            strategy: AuthStrategy::Standard,
            permission: Some(permission),
        }
    }

    pub fn delegated(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            strategy: AuthStrategy::Delegated,
            permission: None,
        }
    }
}

/// Handlers behind the gate take `CurrentUser` directly; a request that
/// reached a handler without one was never authenticated.
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

/// `Authorization: Bearer <token>`, if present and non-empty
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Value of the `token` cookie across all `Cookie` headers
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_PARAM && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Base64-decoded `token` query parameter
///
/// Absent or empty: `Ok(None)`. Present but not base64 (or not UTF-8): 400.
pub fn query_token(uri: &Uri) -> Result<Option<String>, AppError> {
    let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(uri) else {
        return Ok(None);
    };
    let Some(encoded) = params.get(TOKEN_PARAM).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| AppError::invalid_request("token query parameter is not valid base64"))?;
    let token = String::from_utf8(bytes)
        .map_err(|_| AppError::invalid_request("token query parameter is not valid UTF-8"))?;

    Ok(Some(token).filter(|t| !t.is_empty()))
}

/// Session token for the standard strategy
pub fn standard_token(headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
    if let Some(token) = bearer_token(headers) {
        return Ok(token.to_string());
    }
    if let Some(token) = query_token(uri)? {
        return Ok(token);
    }
    cookie_token(headers).ok_or_else(AppError::token_not_found)
}

/// Bearer token and asserted username for the delegated strategy
pub fn delegated_credentials(headers: &HeaderMap) -> Result<(String, String), AppError> {
    let token = bearer_token(headers)
        .map(str::to_string)
        .or_else(|| cookie_token(headers))
        .ok_or_else(AppError::token_not_found)?;

    let username = headers
        .get(DELEGATED_USER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            AppError::with_message(
                crate::ErrorCode::IdentityMissing,
                format!("{DELEGATED_USER_HEADER} header is required"),
            )
        })?;

    Ok((token, username.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (name, value) in pairs {
            h.append(*name, HeaderValue::from_str(value).unwrap());
        }
        h
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_header_beats_query_and_cookie() {
        let h = headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "token=from-cookie"),
        ]);
        let q = format!("/api/v1/users?token={}", BASE64.encode("from-query"));
        assert_eq!(standard_token(&h, &uri(&q)).unwrap(), "from-header");
    }

    #[test]
    fn test_query_beats_cookie() {
        let h = headers(&[("cookie", "token=from-cookie")]);
        let q = format!("/api/v1/users?token={}", BASE64.encode("from-query"));
        assert_eq!(standard_token(&h, &uri(&q)).unwrap(), "from-query");
    }

    #[test]
    fn test_cookie_fallback() {
        let h = headers(&[("cookie", "theme=dark; token=from-cookie; lang=en")]);
        assert_eq!(
            standard_token(&h, &uri("/api/v1/users")).unwrap(),
            "from-cookie"
        );
    }

    #[test]
    fn test_empty_bearer_falls_through() {
        let h = headers(&[("authorization", "Bearer "), ("cookie", "token=c")]);
        assert_eq!(standard_token(&h, &uri("/x")).unwrap(), "c");
    }

    #[test]
    fn test_invalid_base64_query_is_400() {
        let err = standard_token(&HeaderMap::new(), &uri("/x?token=not*base64!")).unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_token_is_400() {
        let err = standard_token(&HeaderMap::new(), &uri("/x")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenNotFound);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_delegated_requires_both() {
        let only_token = headers(&[("authorization", "Bearer t")]);
        let err = delegated_credentials(&only_token).unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let only_user = headers(&[(DELEGATED_USER_HEADER, "alice")]);
        let err = delegated_credentials(&only_user).unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_delegated_ignores_query_token() {
        let h = headers(&[(DELEGATED_USER_HEADER, "alice"), ("cookie", "token=c")]);
        assert_eq!(
            delegated_credentials(&h).unwrap(),
            ("c".to_string(), "alice".to_string())
        );
    }
}

//! Identity platform client
//!
//! Outbound HTTP to the external identity platform used by the delegated
//! strategy. One shared `reqwest::Client` with a request timeout; a single
//! attempt per call, no retries.

use std::time::Duration;

use axum::body::Bytes;
use http::StatusCode;
use reqwest::Url;
use shared::models::GlobalRole;
use thiserror::Error;

use crate::AppError;

/// Identity platform settings
#[derive(Debug, Clone)]
pub struct DelegatedConfig {
    /// Base URL; role lookups go to `{base_url}/users/{user}/globalroles`
    pub base_url: String,
    /// Password-grant token endpoint
    pub token_url: String,
    pub client_id: Option<String>,
    /// Per-request timeout
    pub timeout_ms: u64,
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity platform rejected the credentials ({0})")]
    Rejected(StatusCode),

    #[error("identity platform returned {0}")]
    Status(StatusCode),

    #[error("identity platform request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity platform response unreadable: {0}")]
    Decode(String),

    #[error("invalid identity platform url {0:?}")]
    Url(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            // The caller learns the credential was refused, never why
            IdentityError::Rejected(_) => AppError::unauthorized(),
            other => AppError::upstream(other.to_string()),
        }
    }
}

/// Raw upstream response relayed to the caller
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Identity platform client
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    config: DelegatedConfig,
}

impl IdentityClient {
    pub fn new(config: DelegatedConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DelegatedConfig {
        &self.config
    }

    /// `GET {base}/users/{user}/globalroles` with the caller's bearer token
    ///
    /// 401/403 from upstream: [`IdentityError::Rejected`]. Any other non-2xx,
    /// transport failure or undecodable body is an upstream error.
    pub async fn global_roles(
        &self,
        username: &str,
        token: &str,
    ) -> Result<Vec<GlobalRole>, IdentityError> {
        let url = self.roles_url(username)?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::Rejected(status));
        }
        if !status.is_success() {
            return Err(IdentityError::Status(status));
        }

        resp.json::<Vec<GlobalRole>>()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))
    }

    /// Password-grant form POST to the token endpoint
    ///
    /// Returns whatever the platform answered; only transport failures are
    /// errors here.
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UpstreamResponse, IdentityError> {
        let mut form = vec![
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];
        if let Some(client_id) = self.config.client_id.as_deref() {
            form.push(("client_id", client_id));
        }

        let resp = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    fn roles_url(&self, username: &str) -> Result<Url, IdentityError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|_| IdentityError::Url(self.config.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| IdentityError::Url(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["users", username, "globalroles"]);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    fn client(base_url: &str) -> IdentityClient {
        IdentityClient::new(DelegatedConfig {
            base_url: base_url.into(),
            token_url: format!("{base_url}/oauth/token"),
            client_id: None,
            timeout_ms: 1000,
        })
        .unwrap()
    }

    #[test]
    fn test_roles_url() {
        let c = client("http://idp.local/api");
        assert_eq!(
            c.roles_url("alice").unwrap().as_str(),
            "http://idp.local/api/users/alice/globalroles"
        );

        let c = client("http://idp.local/");
        assert_eq!(
            c.roles_url("alice").unwrap().as_str(),
            "http://idp.local/users/alice/globalroles"
        );
    }

    #[test]
    fn test_username_is_a_single_segment() {
        let c = client("http://idp.local");
        let url = c.roles_url("../admin").unwrap();
        assert_eq!(url.path(), "/users/..%2Fadmin/globalroles");
    }

    #[test]
    fn test_error_mapping() {
        let rejected: AppError = IdentityError::Rejected(StatusCode::FORBIDDEN).into();
        assert_eq!(rejected.http_status(), StatusCode::UNAUTHORIZED);

        let status: AppError = IdentityError::Status(StatusCode::BAD_GATEWAY).into();
        assert_eq!(status.code, ErrorCode::UpstreamError);
        assert_eq!(status.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

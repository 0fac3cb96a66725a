//! License verification
//!
//! The license gate hands the stored license content to a [`LicenseVerifier`].
//! The default verifier understands a JSON document:
//!
//! ```json
//! {"product": "cluster-gate", "corporation": "Acme", "expires_at": "2030-01-01T00:00:00Z"}
//! ```

use chrono::{DateTime, Utc};
use shared::models::LicenseInfo;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseError {
    #[error("license content is malformed: {0}")]
    Malformed(String),

    #[error("license expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Decides whether stored license content is currently valid
pub trait LicenseVerifier: Send + Sync {
    fn verify(&self, content: &str) -> Result<LicenseInfo, LicenseError>;
}

/// JSON license with an expiry
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLicenseVerifier;

impl LicenseVerifier for JsonLicenseVerifier {
    fn verify(&self, content: &str) -> Result<LicenseInfo, LicenseError> {
        let info: LicenseInfo =
            serde_json::from_str(content).map_err(|e| LicenseError::Malformed(e.to_string()))?;
        if info.expires_at <= Utc::now() {
            return Err(LicenseError::Expired(info.expires_at));
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn content(expires_at: DateTime<Utc>) -> String {
        serde_json::json!({
            "product": "cluster-gate",
            "corporation": "Acme",
            "expires_at": expires_at,
        })
        .to_string()
    }

    #[test]
    fn test_valid_license() {
        let info = JsonLicenseVerifier
            .verify(&content(Utc::now() + Duration::days(30)))
            .unwrap();
        assert_eq!(info.corporation, "Acme");
    }

    #[test]
    fn test_expired_license() {
        let err = JsonLicenseVerifier
            .verify(&content(Utc::now() - Duration::days(1)))
            .unwrap_err();
        assert!(matches!(err, LicenseError::Expired(_)));
    }

    #[test]
    fn test_malformed_license() {
        let err = JsonLicenseVerifier.verify("not json").unwrap_err();
        assert!(matches!(err, LicenseError::Malformed(_)));
    }
}

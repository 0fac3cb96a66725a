//! License Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored license: opaque content plus bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub content: String,
    pub imported_at: DateTime<Utc>,
}

impl License {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            imported_at: Utc::now(),
        }
    }
}

/// Import license payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseImport {
    pub content: String,
}

/// Parsed license summary returned by `GET /license`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub product: String,
    pub corporation: String,
    pub expires_at: DateTime<Utc>,
}

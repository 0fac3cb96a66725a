//! External collaborators
//!
//! - [`identity`] - identity platform client (delegated strategy, delegated login)
//! - [`license`] - license content verification

pub mod identity;
pub mod license;

pub use identity::{DelegatedConfig, IdentityClient, IdentityError, UpstreamResponse};
pub use license::{JsonLicenseVerifier, LicenseError, LicenseVerifier};

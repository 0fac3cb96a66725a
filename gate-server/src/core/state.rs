use std::sync::Arc;

use crate::auth::{AuthStrategy, TokenCodec};
use crate::core::{Config, Result};
use crate::routes::{ExemptPaths, RouteRegistry};
use crate::services::{IdentityClient, JsonLicenseVerifier, LicenseVerifier};
use crate::store::Store;

/// Server state - shared handles for every request
///
/// Built once at startup and read-only afterwards. Cloning is cheap: every
/// field is an `Arc`.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | gateway configuration |
/// | store | users, roles and license |
/// | registry | route -> required capability table |
/// | exempt | authentication-exempt paths |
/// | codec | session token signer/verifier |
/// | identity | identity platform client (`None` disables `caas`) |
/// | license_verifier | license content check |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub registry: Arc<RouteRegistry>,
    pub exempt: Arc<ExemptPaths>,
    pub codec: Arc<TokenCodec>,
    pub identity: Option<Arc<IdentityClient>>,
    pub license_verifier: Arc<dyn LicenseVerifier>,
    enabled: Arc<[AuthStrategy]>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("routes", &self.registry.len())
            .field("codec", &self.codec)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Build state from configuration
    ///
    /// Fails on anything that would otherwise break every request: undecodable
    /// signing keys, bad exempt patterns, an identity client that cannot be
    /// constructed.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Result<Self> {
        config.validate()?;

        let codec = TokenCodec::from_config(&config.session)?;
        let exempt = ExemptPaths::from_config(&config)?;
        let registry = RouteRegistry::register(
            &config.base_path,
            &config.group_version,
            crate::api::routes(),
        );
        let identity = match &config.delegated {
            Some(delegated) => Some(Arc::new(IdentityClient::new(delegated.clone())?)),
            None => None,
        };
        let enabled: Arc<[AuthStrategy]> = config.enabled_strategies().into();

        tracing::info!(
            routes = registry.len(),
            default_strategy = %config.default_strategy,
            delegated = identity.is_some(),
            "Server state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            registry: Arc::new(registry),
            exempt: Arc::new(exempt),
            codec: Arc::new(codec),
            identity,
            license_verifier: Arc::new(JsonLicenseVerifier),
            enabled,
        })
    }

    /// Replace the default JSON license verifier
    pub fn with_license_verifier(mut self, verifier: Arc<dyn LicenseVerifier>) -> Self {
        self.license_verifier = verifier;
        self
    }

    /// Strategies this deployment accepts
    pub fn enabled_strategies(&self) -> &[AuthStrategy] {
        &self.enabled
    }

    /// `base_path + group_version + path`
    pub fn api_path(&self, path: &str) -> String {
        self.config.api_path(path)
    }
}

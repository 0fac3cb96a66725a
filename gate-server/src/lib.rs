//! Cluster Gate - per-request authorization gateway
//!
//! # Architecture
//!
//! Every inbound request passes the filter chain before any handler runs:
//!
//! ```text
//! CORS -> license gate -> path exemption -> strategy selection
//!      -> route lookup -> authenticate -> authorize -> handler
//! ```
//!
//! Two interchangeable trust models:
//!
//! - **standard**: locally signed session token + capability bitmask
//! - **caas** (delegated): bearer token + asserted identity, authorization
//!   decided from rules fetched from an external identity platform
//!
//! # Module layout
//!
//! ```text
//! gate-server/src/
//! ├── core/      # config, state, server, startup errors
//! ├── auth/      # strategies, token codec, bitmask + rule matching, filter chain
//! ├── routes/    # route registry, app assembly, request logging
//! ├── api/       # login, probes, license and protected user/role endpoints
//! ├── services/  # identity platform client, license verifier
//! ├── store/     # store trait + in-memory store
//! └── utils/     # logging setup, error re-exports
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

// Re-export public types
pub use auth::{AuthStrategy, CurrentUser, TokenCodec};
pub use core::{Config, Server, ServerError, ServerState};
pub use routes::{RouteDescriptor, RouteRegistry, build_app};
pub use store::{MemoryStore, Store, StoreError};
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing field syntax
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

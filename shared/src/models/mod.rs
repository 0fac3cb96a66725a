//! Data models
//!
//! Permission and identity types shared between the gateway and its API
//! clients. Users, roles and the license are owned by the store; the gateway
//! reads them per request.

pub mod capability;
pub mod delegation;
pub mod license;
pub mod role;
pub mod user;

// Re-exports
pub use capability::{Capability, CapabilityOutOfRange};
pub use delegation::{DelegationRule, GlobalRole, WILDCARD};
pub use license::{License, LicenseImport, LicenseInfo};
pub use role::{ADMIN_ROLE_NAME, Role, RoleCreate, RoleUpdate, is_protected_role_name};
pub use user::{ADMIN_USERNAME, User, UserCreate, UserUpdate, is_protected_username};

//! Role Model

use serde::{Deserialize, Serialize};

use super::Capability;

/// Reserved role name; the role cannot be created, renamed or deleted via the API
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Role entity: a named capability grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub capability: Capability,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capability: Capability) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capability,
        }
    }

    /// Whether this is the protected admin role
    pub fn is_protected(&self) -> bool {
        is_protected_role_name(&self.name)
    }
}

pub fn is_protected_role_name(name: &str) -> bool {
    name == ADMIN_ROLE_NAME
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub id: String,
    pub name: String,
    pub capability: u32,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<u32>,
}

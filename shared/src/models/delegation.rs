//! Identity platform role data
//!
//! Shapes returned by the external identity platform's
//! `/users/{user}/globalroles` endpoint.

use serde::{Deserialize, Serialize};

/// Literal that matches any value in a rule dimension
pub const WILDCARD: &str = "*";

/// One (apiGroups, verbs, resources) grant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationRule {
    #[serde(default)]
    pub api_groups: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Global role as reported by the identity platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub rules: Vec<DelegationRule>,
}

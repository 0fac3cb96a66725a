//! Delegation rule matching
//!
//! Pure wildcard matching over (apiGroup, verb, resource) triples. `"*"` in a
//! dimension matches any candidate; otherwise the candidate must appear
//! verbatim. No case folding, no prefix matching.

use shared::models::{DelegationRule, GlobalRole, WILDCARD};

/// API group every gateway request is checked against
pub const CORE_API_GROUP: &str = "core";

/// True iff `set` contains `"*"` or `candidate` verbatim; an empty set never matches
pub fn matches(set: &[String], candidate: &str) -> bool {
    set.iter().any(|s| s == WILDCARD || s == candidate)
}

/// All three dimensions must match within the same rule
pub fn rule_allows(rule: &DelegationRule, api_group: &str, verb: &str, resource: &str) -> bool {
    matches(&rule.api_groups, api_group)
        && matches(&rule.verbs, verb)
        && matches(&rule.resources, resource)
}

/// Grant iff some rule of some role allows `verb` on any resource of the core group
pub fn roles_allow(roles: &[GlobalRole], verb: &str) -> bool {
    roles
        .iter()
        .flat_map(|role| role.rules.iter())
        .any(|rule| rule_allows(rule, CORE_API_GROUP, verb, WILDCARD))
}

//! Authentication-exempt paths
//!
//! Exact paths and trailing-`*` prefixes that bypass the strategy step. They
//! remain subject to the license gate unless they are license paths too.

use thiserror::Error;

use crate::core::Config;

/// Built-in exempt patterns, relative to the API prefix
pub const BUILTIN_EXEMPT: &[&str] = &[
    "/auth/login",
    "/auth/type",
    "/domain",
    "/exec/*",
    "/ssh/*",
    "/license",
    "/license/import",
];

/// Paths reachable with no (or an invalid) license, relative to the API prefix
pub const LICENSE_PATHS: &[&str] = &["/license", "/license/import"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid exempt pattern {pattern:?}: '*' is only allowed as the last character")]
pub struct ExemptPatternError {
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Exact(String),
    Prefix(String),
}

/// Compiled exempt allow-list
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    patterns: Vec<Pattern>,
}

impl ExemptPaths {
    /// Compile absolute patterns; a `*` anywhere but the end is rejected
    pub fn new<I, S>(patterns: I) -> Result<Self, ExemptPatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Built-in list under the configured API prefix, plus configured extras
    pub fn from_config(config: &Config) -> Result<Self, ExemptPatternError> {
        let builtin = BUILTIN_EXEMPT.iter().map(|p| config.api_path(p));
        Self::new(builtin.chain(config.extra_exempt_paths.iter().cloned()))
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| match p {
            Pattern::Exact(exact) => path == exact,
            Pattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        })
    }
}

/// Whether `path` is one of the always-reachable license paths
pub fn is_license_path(config: &Config, path: &str) -> bool {
    LICENSE_PATHS.iter().any(|p| config.api_path(p) == path)
}

fn compile(pattern: &str) -> Result<Pattern, ExemptPatternError> {
    let pattern = pattern.trim();
    match pattern.find('*') {
        None => Ok(Pattern::Exact(pattern.to_string())),
        Some(idx) if idx == pattern.len() - 1 => {
            Ok(Pattern::Prefix(pattern[..idx].to_string()))
        }
        Some(_) => Err(ExemptPatternError {
            pattern: pattern.to_string(),
        }),
    }
}

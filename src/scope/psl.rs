//! Public Suffix List (PSL) backed eTLD+1 resolution.
//!
//! Deployments that know their registrable domains up front should
//! prefer the ordered domain-list strategy; this module covers the
//! general case with Mozilla's Public Suffix List via the `psl`
//! crate, packaged as a ready-made [`EtldPlusOneResolver`].

use crate::base::error::ResolverError;
use crate::scope::domain::EtldPlusOneResolver;

/// Get the registrable domain (eTLD+1) for a hostname.
/// For "sub.example.com", returns "example.com".
/// For a bare public suffix like "co.uk", returns None.
pub fn registrable_domain(hostname: &str) -> Option<String> {
    let hostname_lower = hostname.to_lowercase();
    psl::domain(hostname_lower.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// Resolver capability backed by the bundled Public Suffix List.
///
/// Fails only for hostnames with no registrable domain at all (bare
/// public suffixes, unknown single labels), in which case the engine
/// falls back to its heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PslResolver;

impl PslResolver {
    pub fn new() -> Self {
        Self
    }
}

impl EtldPlusOneResolver for PslResolver {
    fn resolve(&self, hostname: &str) -> Result<String, ResolverError> {
        registrable_domain(hostname).ok_or_else(|| {
            ResolverError::new(
                hostname,
                "no registrable domain under the public suffix list",
            )
        })
    }
}

//! Registrable-domain resolution for cookie scoping.
//!
//! Every identifier cookie is scoped to the widest domain the site
//! controls so that subdomains share one identity. Non-IP hosts go
//! through one of three construction-time strategies:
//!
//! 1. [`DomainStrategy::Resolver`]: an injected eTLD+1 capability
//! 2. [`DomainStrategy::List`]: an ordered candidate-domain list
//! 3. [`DomainStrategy::Heuristic`]: strip one subdomain label
//!
//! A resolver failure or a list miss falls back to the heuristic. IP
//! hosts bypass all three and scope to the IP itself.

use std::fmt;

use crate::base::error::ResolverError;
use crate::scope::host::{extract_host, is_ip_address, maybe_bracket_ipv6};

/// Capability for mapping a hostname to its registrable domain.
///
/// Implementations may consult the Public Suffix List, customer
/// configuration, or an external service snapshot. Errors are caught
/// by scope resolution and downgrade to the heuristic; they never
/// surface to request processing.
pub trait EtldPlusOneResolver {
    fn resolve(&self, hostname: &str) -> Result<String, ResolverError>;
}

/// How a builder derives the cookie-scoping domain for a host.
pub enum DomainStrategy {
    /// Ordered candidate registrable domains. A hostname matches a
    /// candidate exactly or as a `.candidate` suffix; first match
    /// wins.
    List(Vec<String>),
    /// Injected eTLD+1 capability.
    Resolver(Box<dyn EtldPlusOneResolver + Send + Sync>),
    /// More than two labels: drop the leftmost. Wrong for multi-label
    /// public suffixes like `co.uk`, which is why the other two
    /// strategies exist.
    Heuristic,
}

impl DomainStrategy {
    /// Build a list strategy. Entries go through the host parser, so
    /// `https://example.com:8443` style entries match bare hostnames;
    /// entries that parse to nothing are dropped.
    pub fn from_domain_list<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = domains
            .into_iter()
            .filter_map(|domain| extract_host(domain.as_ref()))
            .collect();
        DomainStrategy::List(normalized)
    }
}

impl fmt::Debug for DomainStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStrategy::List(domains) => f.debug_tuple("List").field(domains).finish(),
            DomainStrategy::Resolver(_) => f.write_str("Resolver(..)"),
            DomainStrategy::Heuristic => f.write_str("Heuristic"),
        }
    }
}

/// Resolved cookie scope for one raw host value.
///
/// Resolution is pure given a strategy, so the result can be cached
/// and reused until the raw host changes (see [`cached_or_resolve`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    /// The raw host value this scope was computed from.
    pub raw_host: String,
    /// Registrable domain, or bracketed IP, for cookie scoping.
    /// `None` when the host yielded no usable hostname.
    pub domain: Option<String>,
    /// Label depth of the scoping domain, `labels - 1`; zero for IPs
    /// and hostless requests. Recorded in every token so consumers can
    /// tell how wide the cookie was set.
    pub subdomain_index: u32,
}

/// Resolve the cookie scope for a raw host value.
pub fn resolve_scope(strategy: &DomainStrategy, raw_host: &str) -> ResolvedScope {
    let (domain, subdomain_index) = match extract_host(raw_host) {
        None => (None, 0),
        Some(hostname) if is_ip_address(&hostname) => (Some(maybe_bracket_ipv6(&hostname)), 0),
        Some(hostname) => {
            let domain = registrable_for(strategy, &hostname);
            let index = domain.split('.').count().saturating_sub(1) as u32;
            tracing::debug!(hostname = %hostname, domain = %domain, "resolved cookie scope");
            (Some(domain), index)
        }
    };
    ResolvedScope {
        raw_host: raw_host.to_string(),
        domain,
        subdomain_index,
    }
}

/// Reuse a cached scope when the raw host is unchanged, otherwise
/// recompute. Keyed on the raw value; two spellings of the same host
/// recompute, which is only a cost, never a correctness issue.
pub fn cached_or_resolve(
    strategy: &DomainStrategy,
    cache: Option<&ResolvedScope>,
    raw_host: &str,
) -> ResolvedScope {
    match cache {
        Some(cached) if cached.raw_host == raw_host => cached.clone(),
        _ => resolve_scope(strategy, raw_host),
    }
}

/// Apply the configured strategy; any miss or failure lands on the
/// heuristic.
fn registrable_for(strategy: &DomainStrategy, hostname: &str) -> String {
    match strategy {
        DomainStrategy::Resolver(resolver) => match resolver.resolve(hostname) {
            Ok(domain) => return domain,
            Err(e) => {
                tracing::warn!(
                    hostname = %hostname,
                    error = %e,
                    "custom eTLD+1 resolver failed, falling back to heuristic"
                );
            }
        },
        DomainStrategy::List(domains) => {
            for candidate in domains {
                if hostname == candidate || hostname.ends_with(&format!(".{candidate}")) {
                    return candidate.clone();
                }
            }
            tracing::debug!(
                hostname = %hostname,
                "no domain-list candidate matched, falling back to heuristic"
            );
        }
        DomainStrategy::Heuristic => {}
    }
    heuristic_domain(hostname).to_string()
}

/// More than two labels: drop the leftmost one. Otherwise unchanged.
fn heuristic_domain(hostname: &str) -> &str {
    if hostname.split('.').count() > 2 {
        match hostname.split_once('.') {
            Some((_, rest)) => rest,
            None => hostname,
        }
    } else {
        hostname
    }
}

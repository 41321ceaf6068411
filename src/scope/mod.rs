//! Cookie scoping: host parsing and registrable-domain resolution.
//!
//! - [`host`]: pull a bare hostname out of whatever the `Host` header carried
//! - [`domain`]: map hostnames to the domain identifier cookies are set on
//! - [`psl`]: Public Suffix List implementation of the resolver capability

pub mod domain;
pub mod host;
pub mod psl;

pub use domain::{
    cached_or_resolve, resolve_scope, DomainStrategy, EtldPlusOneResolver, ResolvedScope,
};
pub use host::{extract_host, is_ip_address};
pub use psl::{registrable_domain, PslResolver};

//! Error types for token validation, version packing, and domain
//! resolution.
//!
//! None of these abort request processing. A [`TokenError`] downgrades
//! the offending cookie to "absent", a [`VersionError`] downgrades the
//! appendix to the fallback language token, and a [`ResolverError`]
//! falls back to heuristic domain derivation.

use thiserror::Error;

/// Why a raw cookie value failed token validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token must have 4 or 5 dot-separated segments.
    #[error("expected 4 or 5 dot-separated segments, found {0}")]
    SegmentCount(usize),

    /// First segment must be the literal `fb` tag.
    #[error("first segment is not the `fb` tag")]
    BadTag,

    /// Second segment must be an ASCII decimal subdomain index.
    #[error("subdomain index segment is not a decimal integer")]
    BadSubdomainIndex,

    /// Third segment must be an ASCII decimal epoch-milliseconds value.
    #[error("timestamp segment is not a decimal integer")]
    BadTimestamp,

    /// Fourth segment carries the payload and must be non-empty.
    #[error("payload segment is empty")]
    EmptyPayload,

    /// Fifth segment, when present, must be a known language token or
    /// an appendix-shaped value.
    #[error("trailing segment is neither a known language token nor an appendix")]
    BadTrailer,
}

/// Why a release version string could not be packed into an appendix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Version must be exactly `major.minor.patch`.
    #[error("version {0:?} is not three dot-separated components")]
    NotThreeComponents(String),

    /// Each component must be a decimal integer that fits in a byte.
    #[error("version component {0:?} is not an integer in 0..=255")]
    ComponentOutOfRange(String),
}

/// Failure reported by a custom eTLD+1 resolver capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("eTLD+1 resolution failed for {hostname:?}: {message}")]
pub struct ResolverError {
    /// Hostname the resolver was asked about.
    pub hostname: String,
    /// Implementation-defined failure description.
    pub message: String,
}

impl ResolverError {
    pub fn new(hostname: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            message: message.into(),
        }
    }
}

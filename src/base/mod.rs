//! Base types and error handling.
//!
//! - [`TokenError`](error::TokenError): defects found in an inbound cookie value
//! - [`VersionError`](error::VersionError): release versions the appendix cannot carry
//! - [`ResolverError`](error::ResolverError): custom eTLD+1 capability failures

pub mod error;

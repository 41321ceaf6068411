//! The identifier-token wire format and its versioned appendix.
//!
//! - [`codec`]: parse, validate, and reassemble dot-delimited tokens
//! - [`appendix`]: pack builder version and change kind into the
//!   trailing segment

pub mod appendix;
pub mod codec;

pub use appendix::{appendix, appendix_for_version, classify_trailing, ChangeKind, Trailing};
pub use codec::{format_token, parse, TokenRecord, Trailer};

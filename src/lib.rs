//! # capi-param-builder
//!
//! Server-side construction of the `_fbc` and `_fbp` identifier
//! cookies for conversion reporting.
//!
//! `capi-param-builder` validates the identifier cookies an inbound
//! request carries, synthesizes or rewrites them according to the
//! click signal in the request, and hands back the exact cookie
//! writes to apply. It never touches a response itself, so it slots
//! into any server stack.
//!
//! ## Features
//!
//! - **Token codec**: strict validation of the dot-delimited wire
//!   format, byte-exact reassembly of accepted values
//! - **Versioned appendix**: change kind and builder version packed
//!   into the token's trailing segment
//! - **Cookie scoping**: eTLD+1 resolution via domain list, injected
//!   resolver, or Public Suffix List, with IP-literal handling
//! - **Click sources**: `fbclid` plus configurable prefixed query
//!   parameters, with referer fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use capi_param_builder::builder::request::RequestView;
//! use capi_param_builder::builder::ParamBuilder;
//!
//! let mut builder = ParamBuilder::with_domain_list(["example.com"]);
//! let request = RequestView::new("shop.example.com")
//!     .query_param("fbclid", "IwAR2F4")
//!     .cookie("_fbp", "fb.1.1554763741205.123456789");
//! for write in builder.process_request(&request) {
//!     println!("Set-Cookie: {}", write.to_set_cookie());
//! }
//! println!("fbc = {:?}", builder.fbc());
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`token`] - Wire format codec and the versioned appendix
//! - [`scope`] - Host parsing and registrable-domain resolution
//! - [`builder`] - The per-request construction engine

pub mod base;
pub mod builder;
pub mod scope;
pub mod token;

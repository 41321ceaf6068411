//! Cookie-write instructions handed back to the caller.
//!
//! The engine never touches a response; it describes the writes and
//! the caller applies them with whatever its framework offers.
//! [`CookieInstruction::to_set_cookie`] renders a ready-made
//! `Set-Cookie` header value for callers with direct header access.

use cookie::Cookie;
use serde::{Deserialize, Serialize};
use time::Duration;

/// Click-identifier cookie name.
pub const CLICK_ID_COOKIE: &str = "_fbc";

/// Browser-identifier cookie name.
pub const BROWSER_ID_COOKIE: &str = "_fbp";

/// Identifier cookie lifetime: 90 days.
pub const DEFAULT_FIRST_PARTY_AGE_SECS: u64 = 90 * 24 * 60 * 60;

/// One cookie the caller should set. At most one instruction per
/// cookie name comes out of a processed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieInstruction {
    /// Cookie name, one of [`CLICK_ID_COOKIE`] or [`BROWSER_ID_COOKIE`].
    pub name: String,
    /// Full token wire value.
    pub value: String,
    /// Relative expiry in seconds.
    pub max_age_secs: u64,
    /// Scoping domain; `None` when the request had no usable host, in
    /// which case the cookie is host-only.
    pub domain: Option<String>,
}

impl CookieInstruction {
    pub(crate) fn new(name: &str, value: String, domain: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            value,
            max_age_secs: DEFAULT_FIRST_PARTY_AGE_SECS,
            domain,
        }
    }

    /// Render a `Set-Cookie` header value carrying exactly the fields
    /// of this instruction: name, value, `Max-Age`, and `Domain` when
    /// present.
    pub fn to_set_cookie(&self) -> String {
        let mut cookie = Cookie::new(self.name.clone(), self.value.clone());
        cookie.set_max_age(Duration::seconds(self.max_age_secs as i64));
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie.to_string()
    }
}

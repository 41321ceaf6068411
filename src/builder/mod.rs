//! Identifier-token construction, one request at a time.
//!
//! The engine takes a [`RequestView`](request::RequestView) and
//! decides which of the two identifier cookies to (re)write:
//!
//! 1. resolve the cookie scope for the request host, reusing the
//!    cached scope while the host stays the same
//! 2. validate the `_fbc` and `_fbp` cookies the browser sent back;
//!    valid four-segment values get a no-change appendix immediately
//! 3. assemble the candidate click payload from the configured sources
//! 4. synthesize a net-new `_fbp` when none survived validation
//! 5. synthesize or rewrite `_fbc` when the click payload is new
//!
//! [`process`] is the whole engine as a pure function over an explicit
//! scope cache; [`ParamBuilder`] wraps it with the cache threaded
//! through `&mut self` for the common single-owner case.

pub mod instruction;
pub mod request;
pub mod sources;

pub use instruction::{CookieInstruction, BROWSER_ID_COOKIE, CLICK_ID_COOKIE};
pub use request::RequestView;
pub use sources::ClickSourceConfig;

use rand::Rng as _;
use time::OffsetDateTime;

use crate::scope::domain::{
    cached_or_resolve, DomainStrategy, EtldPlusOneResolver, ResolvedScope,
};
use crate::token::appendix::{appendix, ChangeKind};
use crate::token::codec;
use sources::assemble_payload;

/// Exclusive upper bound for the random browser-id payload; keeps the
/// value in a 31-bit integer range.
const BROWSER_PAYLOAD_BOUND: u32 = 2_147_483_647;

/// Everything fixed at construction time: click sources, the domain
/// strategy, and the appendix strings, which depend only on the crate
/// version and are packed once.
pub struct BuilderConfig {
    click_sources: Vec<ClickSourceConfig>,
    strategy: DomainStrategy,
    appendix_net_new: String,
    appendix_modified_new: String,
    appendix_no_change: String,
}

impl BuilderConfig {
    /// Configuration with the default literal click-id source.
    pub fn new(strategy: DomainStrategy) -> Self {
        Self {
            click_sources: vec![ClickSourceConfig::click_id()],
            strategy,
            appendix_net_new: appendix(ChangeKind::NetNew),
            appendix_modified_new: appendix(ChangeKind::ModifiedNew),
            appendix_no_change: appendix(ChangeKind::NoChange),
        }
    }

    /// Replace the click-identifier sources.
    pub fn with_click_sources(mut self, sources: Vec<ClickSourceConfig>) -> Self {
        self.click_sources = sources;
        self
    }
}

/// Result of processing one request.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Cookies the caller should set; at most one per cookie name.
    pub cookies_to_set: Vec<CookieInstruction>,
    /// Current click-id token, when the request carried or held one.
    pub fbc: Option<String>,
    /// Current browser-id token; processing always produces one.
    pub fbp: String,
    /// Scope to hand back as the cache for the next call.
    pub scope: ResolvedScope,
}

/// Process one request against `config`, reusing `cache` while its
/// raw host matches the request's.
pub fn process(
    config: &BuilderConfig,
    cache: Option<&ResolvedScope>,
    request: &RequestView,
) -> ProcessOutcome {
    let scope = cached_or_resolve(&config.strategy, cache, &request.host);
    let mut writes = WriteSet::new();

    // Capture what the browser already holds. Valid four-segment
    // values are rewritten with a no-change appendix on the spot.
    let mut fbc = preprocess_cookie(config, &scope, request, CLICK_ID_COOKIE, &mut writes);
    let fbp = preprocess_cookie(config, &scope, request, BROWSER_ID_COOKIE, &mut writes);

    let candidate = assemble_payload(
        &config.click_sources,
        &request.query_params,
        request.referer.as_deref(),
    );

    // Browser id: synthesize when none survived validation.
    let fbp = match fbp {
        Some(value) => value,
        None => {
            let payload = rand::rng().random_range(0..BROWSER_PAYLOAD_BOUND);
            let value = codec::format_token(
                scope.subdomain_index,
                now_ms(),
                &payload.to_string(),
                &config.appendix_net_new,
            );
            writes.schedule(BROWSER_ID_COOKIE, value.clone(), &scope);
            tracing::debug!(token = %value, "synthesized browser id");
            value
        }
    };

    // Click id: acted on only when the request carried a click signal.
    if let Some(candidate) = candidate {
        let rewrite_appendix = match &fbc {
            None => Some(&config.appendix_net_new),
            Some(current) => {
                let current_payload = current.split('.').nth(3).unwrap_or_default();
                if current_payload != candidate {
                    Some(&config.appendix_modified_new)
                } else {
                    None
                }
            }
        };
        if let Some(rewrite_appendix) = rewrite_appendix {
            let value = codec::format_token(
                scope.subdomain_index,
                now_ms(),
                &candidate,
                rewrite_appendix,
            );
            writes.schedule(CLICK_ID_COOKIE, value.clone(), &scope);
            fbc = Some(value);
        }
    }

    ProcessOutcome {
        cookies_to_set: writes.into_vec(),
        fbc,
        fbp,
        scope,
    }
}

/// Validate one identifier cookie from the request. A valid
/// four-segment value is rewritten with a no-change appendix and the
/// write scheduled immediately; anything invalid is treated as absent.
fn preprocess_cookie(
    config: &BuilderConfig,
    scope: &ResolvedScope,
    request: &RequestView,
    name: &str,
    writes: &mut WriteSet,
) -> Option<String> {
    let raw = request.cookies.get(name).filter(|value| !value.is_empty())?;
    let record = match codec::parse(raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(cookie = name, reason = %e, "discarding invalid identifier cookie");
            return None;
        }
    };
    if record.needs_rewrite() {
        let value = record.with_appendix(&config.appendix_no_change);
        writes.schedule(name, value.clone(), scope);
        return Some(value);
    }
    Some(raw.clone())
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

/// Pending writes, keyed by cookie name: one instruction per cookie,
/// last write wins, first-scheduled order preserved.
struct WriteSet {
    writes: Vec<CookieInstruction>,
}

impl WriteSet {
    fn new() -> Self {
        Self { writes: Vec::new() }
    }

    fn schedule(&mut self, name: &str, value: String, scope: &ResolvedScope) {
        let instruction = CookieInstruction::new(name, value, scope.domain.clone());
        match self.writes.iter_mut().find(|write| write.name == name) {
            Some(existing) => *existing = instruction,
            None => self.writes.push(instruction),
        }
    }

    fn into_vec(self) -> Vec<CookieInstruction> {
        self.writes
    }
}

/// Builds and maintains the `_fbc` and `_fbp` identifier cookies for
/// inbound requests.
///
/// A builder holds construction-time configuration plus a one-entry
/// scope cache; each call to
/// [`process_request`](Self::process_request) otherwise starts from a
/// clean slate. For concurrent callers, share a [`BuilderConfig`] and
/// drive [`process`] with one cache value per logical session instead.
pub struct ParamBuilder {
    config: BuilderConfig,
    scope_cache: Option<ResolvedScope>,
    cookies_to_set: Vec<CookieInstruction>,
    fbc: Option<String>,
    fbp: Option<String>,
}

impl ParamBuilder {
    /// Heuristic-only domain scoping.
    pub fn new() -> Self {
        Self::with_strategy(DomainStrategy::Heuristic)
    }

    /// Scope cookies against an ordered list of candidate registrable
    /// domains. Entries are normalized through the host parser, so
    /// URL-shaped entries with scheme or port are accepted.
    pub fn with_domain_list<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_strategy(DomainStrategy::from_domain_list(domains))
    }

    /// Scope cookies with an injected eTLD+1 resolver capability.
    pub fn with_resolver<R>(resolver: R) -> Self
    where
        R: EtldPlusOneResolver + Send + Sync + 'static,
    {
        Self::with_strategy(DomainStrategy::Resolver(Box::new(resolver)))
    }

    /// Construct from an explicit strategy.
    pub fn with_strategy(strategy: DomainStrategy) -> Self {
        Self::from_config(BuilderConfig::new(strategy))
    }

    /// Construct from a fully assembled configuration.
    pub fn from_config(config: BuilderConfig) -> Self {
        Self {
            config,
            scope_cache: None,
            cookies_to_set: Vec::new(),
            fbc: None,
            fbp: None,
        }
    }

    /// Replace the click-identifier sources.
    pub fn with_click_sources(mut self, sources: Vec<ClickSourceConfig>) -> Self {
        self.config = self.config.with_click_sources(sources);
        self
    }

    /// Process one request and return the cookies the caller should
    /// set. The same list stays available through
    /// [`cookies_to_set`](Self::cookies_to_set) until the next call.
    pub fn process_request(&mut self, request: &RequestView) -> Vec<CookieInstruction> {
        let outcome = process(&self.config, self.scope_cache.as_ref(), request);
        self.scope_cache = Some(outcome.scope);
        self.fbc = outcome.fbc;
        self.fbp = Some(outcome.fbp);
        self.cookies_to_set = outcome.cookies_to_set;
        self.cookies_to_set.clone()
    }

    /// Cookie writes scheduled by the last processed request.
    pub fn cookies_to_set(&self) -> &[CookieInstruction] {
        &self.cookies_to_set
    }

    /// Click-id token after the last processed request, if any.
    pub fn fbc(&self) -> Option<&str> {
        self.fbc.as_deref()
    }

    /// Browser-id token after the last processed request.
    pub fn fbp(&self) -> Option<&str> {
        self.fbp.as_deref()
    }
}

impl Default for ParamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

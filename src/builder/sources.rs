//! Click-identifier sources and candidate-payload assembly.
//!
//! A click signal usually arrives as the `fbclid` query parameter,
//! but deployments can configure additional sources that contribute
//! prefixed values. Sources are consulted in configuration order;
//! each reads the request query first and falls back to the query
//! string of the referer, and the contributions are joined into one
//! candidate payload per request.

use std::collections::HashMap;

use url::Url;

/// Query parameter carrying the literal click id.
pub const CLICK_ID_PARAM: &str = "fbclid";

const CLICK_ID_LABEL: &str = "clickID";

/// One configured click-identifier source: where to look and how to
/// tag what was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickSourceConfig {
    /// Query parameter name to read.
    pub query_param: String,
    /// Prefix recorded in front of the contributed value.
    pub prefix: String,
    /// Human-readable name for the source.
    pub label: String,
}

impl ClickSourceConfig {
    pub fn new(
        query_param: impl Into<String>,
        prefix: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            query_param: query_param.into(),
            prefix: prefix.into(),
            label: label.into(),
        }
    }

    /// The default literal click-id source.
    pub fn click_id() -> Self {
        Self::new(CLICK_ID_PARAM, "", CLICK_ID_LABEL)
    }

    fn is_click_id(&self) -> bool {
        self.query_param == CLICK_ID_PARAM
    }
}

/// Assemble the candidate click payload for one request. Returns
/// `None` when no source contributed anything.
pub(crate) fn assemble_payload(
    sources: &[ClickSourceConfig],
    query_params: &HashMap<String, String>,
    referer: Option<&str>,
) -> Option<String> {
    let referer_url = referer.and_then(parse_referer);
    let mut payload = String::new();
    for source in sources {
        let value = query_params
            .get(&source.query_param)
            .filter(|v| !v.is_empty())
            .cloned()
            .or_else(|| referer_query_value(referer_url.as_ref(), &source.query_param));
        if let Some(value) = value {
            append_contribution(&mut payload, source, &value);
        }
    }
    if payload.is_empty() {
        None
    } else {
        Some(payload)
    }
}

/// Append one source contribution.
///
/// The literal click-id source joins bare: no separator and no
/// duplicate guard. Every other source contributes `prefix_value`,
/// joined with `_`, and is skipped once its `_prefix_` marker already
/// appears in the accumulation.
fn append_contribution(payload: &mut String, source: &ClickSourceConfig, value: &str) {
    if source.is_click_id() {
        payload.push_str(&source.prefix);
        payload.push_str(value);
        return;
    }

    let marker = format!("_{}_", source.prefix);
    if payload.contains(&marker) {
        tracing::debug!(
            source = %source.label,
            "duplicate prefix in click payload, contribution skipped"
        );
        return;
    }
    if !payload.is_empty() {
        payload.push('_');
    }
    payload.push_str(&source.prefix);
    payload.push('_');
    payload.push_str(value);
}

/// Parse a referer, assuming `http://` when no scheme is present.
/// An unparsable referer contributes no click signal.
fn parse_referer(referer: &str) -> Option<Url> {
    if referer.is_empty() {
        return None;
    }
    let absolute;
    let candidate = if referer.contains("://") {
        referer
    } else {
        absolute = format!("http://{referer}");
        &absolute
    };
    match Url::parse(candidate) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!(error = %e, "unparsable referer, ignoring it");
            None
        }
    }
}

/// First non-empty occurrence of `name` in the referer query string.
fn referer_query_value(url: Option<&Url>, name: &str) -> Option<String> {
    url?.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_literal_click_id_contributes_bare() {
        let sources = [ClickSourceConfig::click_id()];
        let payload = assemble_payload(&sources, &params(&[("fbclid", "IwAR2F4")]), None);
        assert_eq!(payload.as_deref(), Some("IwAR2F4"));
    }

    #[test]
    fn test_prefixed_sources_join_with_underscores() {
        let sources = [
            ClickSourceConfig::click_id(),
            ClickSourceConfig::new("query", "test", "testSource"),
        ];
        let payload = assemble_payload(
            &sources,
            &params(&[("fbclid", "test123"), ("query", "placeholder")]),
            None,
        );
        assert_eq!(payload.as_deref(), Some("test123_test_placeholder"));
    }

    #[test]
    fn test_prefixed_source_alone_has_no_leading_separator() {
        let sources = [ClickSourceConfig::new("query", "test", "testSource")];
        let payload = assemble_payload(&sources, &params(&[("query", "placeholder")]), None);
        assert_eq!(payload.as_deref(), Some("test_placeholder"));
    }

    #[test]
    fn test_duplicate_prefix_after_click_id_is_skipped() {
        let sources = [
            ClickSourceConfig::click_id(),
            ClickSourceConfig::new("q1", "test", "first"),
            ClickSourceConfig::new("q2", "test", "second"),
        ];
        let payload = assemble_payload(
            &sources,
            &params(&[("fbclid", "abc"), ("q1", "one"), ("q2", "two")]),
            None,
        );
        assert_eq!(payload.as_deref(), Some("abc_test_one"));
    }

    #[test]
    fn test_duplicate_guard_is_a_marker_substring_check() {
        // A contribution at the very start has no leading underscore,
        // so its marker is not yet present and a same-prefix source
        // still joins.
        let sources = [
            ClickSourceConfig::new("q1", "test", "first"),
            ClickSourceConfig::new("q2", "test", "second"),
        ];
        let payload = assemble_payload(&sources, &params(&[("q1", "one"), ("q2", "two")]), None);
        assert_eq!(payload.as_deref(), Some("test_one_test_two"));
    }

    #[test]
    fn test_empty_query_value_is_absent() {
        let sources = [ClickSourceConfig::click_id()];
        assert_eq!(assemble_payload(&sources, &params(&[("fbclid", "")]), None), None);
        assert_eq!(assemble_payload(&sources, &params(&[]), None), None);
    }

    #[test]
    fn test_referer_fills_in_for_missing_query() {
        let sources = [ClickSourceConfig::click_id()];
        let payload = assemble_payload(
            &sources,
            &params(&[]),
            Some("https://example.com/landing?fbclid=fromreferer"),
        );
        assert_eq!(payload.as_deref(), Some("fromreferer"));
    }

    #[test]
    fn test_query_beats_referer() {
        let sources = [ClickSourceConfig::click_id()];
        let payload = assemble_payload(
            &sources,
            &params(&[("fbclid", "fromquery")]),
            Some("https://example.com/?fbclid=fromreferer"),
        );
        assert_eq!(payload.as_deref(), Some("fromquery"));
    }

    #[test]
    fn test_schemeless_referer_is_parsed() {
        let sources = [ClickSourceConfig::click_id()];
        let payload = assemble_payload(&sources, &params(&[]), Some("example.com?fbclid=test123"));
        assert_eq!(payload.as_deref(), Some("test123"));
    }

    #[test]
    fn test_unparsable_referer_contributes_nothing() {
        let sources = [ClickSourceConfig::click_id()];
        assert_eq!(assemble_payload(&sources, &params(&[]), Some("http://")), None);
        assert_eq!(assemble_payload(&sources, &params(&[]), Some("")), None);
    }

    #[test]
    fn test_sources_mix_query_and_referer() {
        let sources = [
            ClickSourceConfig::click_id(),
            ClickSourceConfig::new("query", "test", "testSource"),
        ];
        let payload = assemble_payload(
            &sources,
            &params(&[("query", "placeholder")]),
            Some("https://example.com?fbclid=456test"),
        );
        assert_eq!(payload.as_deref(), Some("456test_test_placeholder"));
    }
}

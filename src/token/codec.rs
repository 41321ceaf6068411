//! Dot-delimited identifier-token wire format.
//!
//! `fb.<subdomainIndex>.<timestampMs>.<payload>[.<appendix>]`, four or
//! five segments. Parsing validates against this fixed grammar; the
//! numeric segments are checked but kept exactly as written, so a
//! reassembled token is byte-identical to its input. Four-segment
//! tokens predate the appendix and are flagged for rewrite.

use crate::base::error::TokenError;
use crate::token::appendix::{classify_trailing, Trailing};

/// Leading tag of every identifier token.
pub const TOKEN_TAG: &str = "fb";

const MIN_SEGMENTS: usize = 4;
const MAX_SEGMENTS: usize = 5;

/// Trailing-segment state of a parsed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trailer {
    /// Four-segment token from before the appendix existed.
    Missing,
    /// Recognized two-character language token from an earlier
    /// builder generation.
    LegacyLanguage(String),
    /// Eight-character current-format appendix.
    Appendix(String),
}

/// A validated token, split into its wire segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Subdomain depth, as written.
    pub subdomain_index: String,
    /// Creation time in epoch milliseconds, as written.
    pub timestamp_ms: String,
    /// Opaque payload segment.
    pub payload: String,
    /// Trailing-segment state.
    pub trailer: Trailer,
}

/// Parse a raw cookie value against the token grammar.
///
/// Callers treat any [`TokenError`] as "no token present"; a hostile
/// or corrupted cookie must never block request processing.
pub fn parse(raw: &str) -> Result<TokenRecord, TokenError> {
    let segments: Vec<&str> = raw.split('.').collect();
    if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments.len()) {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    // An unrecognizable fifth segment poisons the whole token. The
    // first four segments are not salvaged: the value was produced by
    // something we do not understand, so nothing in it is trusted.
    let trailer = if segments.len() == MAX_SEGMENTS {
        let last = segments[MAX_SEGMENTS - 1];
        match classify_trailing(last) {
            Trailing::LegacyLanguage => Trailer::LegacyLanguage(last.to_string()),
            Trailing::Appendix => Trailer::Appendix(last.to_string()),
            Trailing::Invalid => return Err(TokenError::BadTrailer),
        }
    } else {
        Trailer::Missing
    };

    if segments[0] != TOKEN_TAG {
        return Err(TokenError::BadTag);
    }
    if !is_decimal(segments[1]) {
        return Err(TokenError::BadSubdomainIndex);
    }
    if !is_decimal(segments[2]) {
        return Err(TokenError::BadTimestamp);
    }
    if segments[3].is_empty() {
        return Err(TokenError::EmptyPayload);
    }

    Ok(TokenRecord {
        subdomain_index: segments[1].to_string(),
        timestamp_ms: segments[2].to_string(),
        payload: segments[3].to_string(),
        trailer,
    })
}

fn is_decimal(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

impl TokenRecord {
    /// True for four-segment tokens that must gain an appendix.
    pub fn needs_rewrite(&self) -> bool {
        matches!(self.trailer, Trailer::Missing)
    }

    /// Reassemble the wire value exactly as parsed.
    pub fn cookie_value(&self) -> String {
        let mut value = self.core_value();
        match &self.trailer {
            Trailer::Missing => {}
            Trailer::LegacyLanguage(trailing) | Trailer::Appendix(trailing) => {
                value.push('.');
                value.push_str(trailing);
            }
        }
        value
    }

    /// Wire value with `appendix` as the fifth segment, the first four
    /// segments untouched.
    pub fn with_appendix(&self, appendix: &str) -> String {
        format!("{}.{appendix}", self.core_value())
    }

    fn core_value(&self) -> String {
        format!(
            "{TOKEN_TAG}.{}.{}.{}",
            self.subdomain_index, self.timestamp_ms, self.payload
        )
    }
}

/// Assemble a fresh token from parts.
pub fn format_token(
    subdomain_index: u32,
    timestamp_ms: u64,
    payload: &str,
    appendix: &str,
) -> String {
    format!("{TOKEN_TAG}.{subdomain_index}.{timestamp_ms}.{payload}.{appendix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_four_segment_token() {
        let record = parse("fb.1.1554763741205.AbCdEfGhIj").unwrap();
        assert_eq!(record.subdomain_index, "1");
        assert_eq!(record.timestamp_ms, "1554763741205");
        assert_eq!(record.payload, "AbCdEfGhIj");
        assert_eq!(record.trailer, Trailer::Missing);
        assert!(record.needs_rewrite());
    }

    #[test]
    fn test_parses_five_segment_token_with_appendix() {
        let record = parse("fb.2.123.abc.AQgCAQAB").unwrap();
        assert_eq!(
            record.trailer,
            Trailer::Appendix("AQgCAQAB".to_string())
        );
        assert!(!record.needs_rewrite());
    }

    #[test]
    fn test_parses_five_segment_token_with_legacy_language() {
        let record = parse("fb.1.123.abc.Bg").unwrap();
        assert_eq!(
            record.trailer,
            Trailer::LegacyLanguage("Bg".to_string())
        );
        assert!(!record.needs_rewrite());
    }

    #[test]
    fn test_rejects_wrong_segment_counts() {
        assert_eq!(parse("fb.1.123"), Err(TokenError::SegmentCount(3)));
        assert_eq!(
            parse("fb.1.123.abc.AQgCAQAB.extra"),
            Err(TokenError::SegmentCount(6))
        );
        assert_eq!(parse(""), Err(TokenError::SegmentCount(1)));
    }

    #[test]
    fn test_rejects_bad_segments() {
        assert_eq!(parse("fx.1.123.abc"), Err(TokenError::BadTag));
        assert_eq!(parse("fb.x.123.abc"), Err(TokenError::BadSubdomainIndex));
        assert_eq!(parse("fb..123.abc"), Err(TokenError::BadSubdomainIndex));
        assert_eq!(parse("fb.1.12a3.abc"), Err(TokenError::BadTimestamp));
        assert_eq!(parse("fb.1.123."), Err(TokenError::EmptyPayload));
    }

    #[test]
    fn test_rejects_unrecognized_trailers() {
        assert_eq!(parse("fb.1.123.abc.invalid"), Err(TokenError::BadTrailer));
        assert_eq!(parse("fb.1.123.abc.ZZ"), Err(TokenError::BadTrailer));
        assert_eq!(parse("fb.1.123.abc.A"), Err(TokenError::BadTrailer));
    }

    #[test]
    fn test_trailer_check_happens_even_when_core_is_bad() {
        // A 5-segment token with a bad trailer reports the trailer,
        // not whichever core defect also exists.
        assert_eq!(parse("fx.x.y..junk"), Err(TokenError::BadTrailer));
    }

    #[test]
    fn test_reassembly_is_byte_exact() {
        for raw in [
            "fb.1.1554763741205.AbCdEfGhIj",
            "fb.01.0042.payload",
            "fb.1.123.abc.Bg",
            "fb.0.987654321.x_y-z.AQgAAQAB",
        ] {
            assert_eq!(parse(raw).unwrap().cookie_value(), raw);
        }
    }

    #[test]
    fn test_with_appendix_preserves_core_segments() {
        let record = parse("fb.01.0042.payload").unwrap();
        assert_eq!(
            record.with_appendix("AQgAAQAB"),
            "fb.01.0042.payload.AQgAAQAB"
        );
    }

    #[test]
    fn test_formats_fresh_tokens() {
        assert_eq!(
            format_token(2, 1554763741205, "IwAR2F4", "AQgCAQAB"),
            "fb.2.1554763741205.IwAR2F4.AQgCAQAB"
        );
        let record = parse(&format_token(0, 1, "p", "AQgCAQAB")).unwrap();
        assert_eq!(record.payload, "p");
    }
}

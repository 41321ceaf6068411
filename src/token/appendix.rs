//! Versioned metadata appendix stamped onto identifier tokens.
//!
//! The appendix is the token's fifth segment. Current-format builders
//! pack six bytes, `[format, language index, change kind, major,
//! minor, patch]`, into eight characters of unpadded URL-safe base64.
//! Earlier builder generations stamped a bare two-character language
//! token instead; those are still accepted on inbound tokens but
//! never produced.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::base::error::VersionError;

/// Appendix format version byte.
const FORMAT_VERSION: u8 = 0x01;

/// Language index assigned to this builder implementation.
const LANGUAGE_INDEX: u8 = 0x08;

/// Bare language token for this builder, stamped when the release
/// version cannot be packed into an appendix.
pub const FALLBACK_LANGUAGE_TOKEN: &str = "CA";

/// Language tokens stamped by earlier builder generations: unpadded
/// URL-safe base64 of the single language-index bytes `0x01..=0x08`.
pub const SUPPORTED_LANGUAGE_TOKENS: [&str; 8] =
    ["AQ", "Ag", "Aw", "BA", "BQ", "Bg", "Bw", "CA"];

const LANGUAGE_TOKEN_LEN: usize = 2;
const APPENDIX_LEN: usize = 8;

/// What kind of change a token write is recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Existing token kept as-is, only the appendix was added.
    NoChange,
    /// Reserved middle ground between [`NetNew`](Self::NetNew) and
    /// [`ModifiedNew`](Self::ModifiedNew); recognized but not
    /// currently emitted.
    GeneralNew,
    /// Token synthesized where none existed.
    NetNew,
    /// Existing token rewritten with a different payload.
    ModifiedNew,
}

impl ChangeKind {
    fn as_byte(self) -> u8 {
        match self {
            ChangeKind::NoChange => 0x00,
            ChangeKind::GeneralNew => 0x01,
            ChangeKind::NetNew => 0x02,
            ChangeKind::ModifiedNew => 0x03,
        }
    }
}

/// Shape classification of a token's trailing segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    /// Two characters from the fixed legacy language-token set.
    LegacyLanguage,
    /// Eight characters, current-format appendix. Content is not
    /// inspected; the encoder here is the only producer we trust.
    Appendix,
    /// Anything else. The whole token is rejected downstream.
    Invalid,
}

/// Classify a trailing token segment by shape alone.
pub fn classify_trailing(segment: &str) -> Trailing {
    match segment.len() {
        LANGUAGE_TOKEN_LEN => {
            if SUPPORTED_LANGUAGE_TOKENS.contains(&segment) {
                Trailing::LegacyLanguage
            } else {
                Trailing::Invalid
            }
        }
        APPENDIX_LEN => Trailing::Appendix,
        _ => Trailing::Invalid,
    }
}

/// Appendix string for this crate's release version.
///
/// Falls back to [`FALLBACK_LANGUAGE_TOKEN`] when the version cannot
/// be packed, so token construction itself never fails.
pub fn appendix(kind: ChangeKind) -> String {
    match appendix_for_version(env!("CARGO_PKG_VERSION"), kind) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "release version not appendix-encodable, stamping bare language token"
            );
            FALLBACK_LANGUAGE_TOKEN.to_string()
        }
    }
}

/// Pack `[format, language, kind, major, minor, patch]` for an
/// explicit `major.minor.patch` version string.
pub fn appendix_for_version(version: &str, kind: ChangeKind) -> Result<String, VersionError> {
    let [major, minor, patch] = parse_version_triple(version)?;
    let record = [
        FORMAT_VERSION,
        LANGUAGE_INDEX,
        kind.as_byte(),
        major,
        minor,
        patch,
    ];
    Ok(URL_SAFE_NO_PAD.encode(record))
}

/// Version must be exactly three dot-separated decimal components,
/// each fitting in a byte.
fn parse_version_triple(version: &str) -> Result<[u8; 3], VersionError> {
    let mut triple = [0u8; 3];
    let mut count = 0usize;
    for component in version.split('.') {
        if count == 3 {
            return Err(VersionError::NotThreeComponents(version.to_string()));
        }
        if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VersionError::ComponentOutOfRange(component.to_string()));
        }
        triple[count] = component
            .parse::<u8>()
            .map_err(|_| VersionError::ComponentOutOfRange(component.to_string()))?;
        count += 1;
    }
    if count != 3 {
        return Err(VersionError::NotThreeComponents(version.to_string()));
    }
    Ok(triple)
}

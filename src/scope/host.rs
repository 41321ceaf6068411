//! Host-header parsing.
//!
//! Inbound host values arrive in several shapes depending on the
//! framework and any edge proxies in front of it: bare hostnames,
//! `scheme://host:port` absolute forms, bracketed IPv6 literals.
//! Extraction is best-effort trimming and never fails; an empty result
//! is reported as no host at all.

/// Extract a bare hostname from a raw host value.
///
/// Strips a leading `scheme://`, a trailing `:port`, and wrapping
/// IPv6 brackets, in that order. Returns `None` when nothing remains.
pub fn extract_host(raw: &str) -> Option<String> {
    let mut value = match raw.find("://") {
        Some(pos) => &raw[pos + 3..],
        None => raw,
    };

    // Text after the last colon is a port, unless that colon sits
    // inside a bracketed IPv6 literal.
    if let Some(colon) = value.rfind(':') {
        let bracket = value.rfind(']');
        if bracket.map_or(true, |b| colon > b) {
            value = &value[..colon];
        }
    }

    if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
        value = &value[1..value.len() - 1];
    }

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// True when the value is an IPv4 dotted quad or structurally valid
/// IPv6 text. IP hosts get no registrable-domain treatment.
pub fn is_ip_address(value: &str) -> bool {
    is_ipv4_address(value) || is_ipv6_address(value)
}

/// Strict dotted quad: four decimal octets, each in 0..=255.
fn is_ipv4_address(value: &str) -> bool {
    let mut octets = 0usize;
    for part in value.split('.') {
        octets += 1;
        if octets > 4 || part.is_empty() || part.len() > 3 {
            return false;
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        // At most 3 digits, so the parse can only fail on range.
        if part.parse::<u16>().map_or(true, |n| n > 255) {
            return false;
        }
    }
    octets == 4
}

/// Structural IPv6 check: at most 8 groups, at most one elided (`::`)
/// run, and every non-empty group is 1 to 4 hex digits.
pub fn is_ipv6_address(value: &str) -> bool {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 8 {
        return false;
    }
    let mut empty_groups = 0usize;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            // A leading empty group belongs to `::...` and is free.
            if i > 0 {
                empty_groups += 1;
                if empty_groups > 1 {
                    return false;
                }
            }
        } else if part.len() > 4 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }
    }
    true
}

/// Bracket an IPv6 literal so it can serve as a cookie domain.
/// Anything without a colon passes through unchanged.
pub fn maybe_bracket_ipv6(value: &str) -> String {
    if value.contains(':') {
        format!("[{value}]")
    } else {
        value.to_string()
    }
}

//! Slug derivation
//!
//! `{slugified-title}-{suffix}` where the suffix is the last six base-36
//! digits of the epoch-millisecond timestamp. Two submissions get distinct
//! suffixes as long as their timestamps differ by at least one millisecond
//! (and by less than 36^6 ms, roughly 25 days, which is where the truncated
//! suffix wraps around).

use std::sync::LazyLock;

use regex::Regex;

/// Length of the time-derived suffix
pub const SUFFIX_LEN: usize = 6;

/// Used when nothing of the title survives slugification
const FALLBACK_BASE: &str = "pagina";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Lowercase, whitespace runs to hyphens, drop anything outside `[a-z0-9-]`
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    WHITESPACE
        .replace_all(&lowered, "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Base-36 rendering of `value` (digits then lowercase letters)
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Last [`SUFFIX_LEN`] base-36 digits of `millis`, zero padded
pub fn time_suffix(millis: u64) -> String {
    let encoded = to_base36(millis);
    let tail = &encoded[encoded.len().saturating_sub(SUFFIX_LEN)..];
    format!("{tail:0>width$}", width = SUFFIX_LEN)
}

/// Unique slug for `title` submitted at `millis`
pub fn derive_slug(title: &str, millis: u64) -> String {
    let base = slugify(title);
    let base = if base.trim_matches('-').is_empty() {
        FALLBACK_BASE
    } else {
        base.as_str()
    };
    format!("{}-{}", base, time_suffix(millis))
}

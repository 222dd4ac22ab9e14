//! String utilities
//!
//! Helpers for shortening text safely at character boundaries, used when
//! credentials or narration text end up in log lines.

/// Number of leading characters of a credential that may appear in logs
const VISIBLE_KEY_PREFIX: usize = 4;

/// Truncate a string to at most `max_chars` characters
///
/// # Example
/// ```
/// use vidgen_helper::utils::truncate_str;
///
/// assert_eq!(truncate_str("Narration", 4), "Narr");
/// assert_eq!(truncate_str("Szene für", 100), "Szene für");
/// ```
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string and append `suffix` when anything was cut
pub fn truncate_with_suffix(s: &str, max_chars: usize, suffix: &str) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}{}", truncate_str(s, max_chars), suffix)
    }
}

/// Redact a credential for display, keeping a short prefix for identification
///
/// Keys short enough that the prefix would reveal most of them are fully masked.
///
/// # Example
/// ```
/// use vidgen_helper::utils::mask_key;
///
/// assert_eq!(mask_key("AIzaSyExampleKey"), "AIza…(16)");
/// assert_eq!(mask_key("short"), "…(5)");
/// ```
pub fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= VISIBLE_KEY_PREFIX * 2 {
        format!("…({})", len)
    } else {
        format!("{}…({})", truncate_str(key, VISIBLE_KEY_PREFIX), len)
    }
}

//! Strip characters that spreadsheet and XML-based writers reject.
//!
//! Every free-text field goes through [`sanitize`] before it enters a
//! [`MessageRecord`](crate::core::models::MessageRecord). The permitted set is
//! the XML 1.0 `Char` production:
//!
//! | Range | Meaning |
//! |-------|---------|
//! | U+0009, U+000A, U+000D | tab, line feed, carriage return |
//! | U+0020 – U+D7FF | printable BMP below the surrogates |
//! | U+E000 – U+FFFD | private use and the rest of the BMP |
//! | U+10000 – U+10FFFF | supplementary planes |
//!
//! Rust `char` can never hold a surrogate, so the surrogate gap needs no
//! special handling. What actually gets removed is C0 control characters
//! (other than the three whitespace ones) and U+FFFE / U+FFFF.
//!
//! # Example
//!
//! ```
//! use chatharvest::core::sanitize::sanitize;
//!
//! assert_eq!(sanitize("bell\u{7}less"), "bellless");
//! assert_eq!(sanitize("tab\tkept"), "tab\tkept");
//! ```

/// Returns `true` if `c` may appear in sanitized output.
#[inline]
pub fn is_permitted(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Removes every character outside the permitted set.
///
/// Total and idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    if is_clean(text) {
        return text.to_string();
    }
    text.chars().filter(|&c| is_permitted(c)).collect()
}

/// Sanitizes an optional field. `None` yields an empty string.
pub fn sanitize_opt(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}

/// Returns `true` if `text` contains only permitted characters.
pub fn is_clean(text: &str) -> bool {
    text.chars().all(is_permitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_whitespace_controls() {
        assert_eq!(sanitize("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_strips_c0_controls() {
        assert_eq!(sanitize("\u{0}\u{1}hello\u{8}\u{B}\u{C}\u{1F}"), "hello");
    }

    #[test]
    fn test_strips_nonchars() {
        assert_eq!(sanitize("x\u{FFFE}y\u{FFFF}z"), "xyz");
    }

    #[test]
    fn test_keeps_unicode() {
        let text = "Привет 村上 محمد 🔥👨‍👩‍👧‍👦 \u{E000}\u{FFFD}";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_empty_and_none() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize_opt(None), "");
        assert_eq!(sanitize_opt(Some("ok\u{7}")), "ok");
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize("mixed\u{2}\u{FFFF}text\n");
        assert_eq!(sanitize(&once), once);
        assert!(is_clean(&once));
    }
}

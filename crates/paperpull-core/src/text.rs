//! Free-text normalization for titles and author surnames.
//!
//! All comparisons in the matching layer operate on normalized forms:
//! lowercase, punctuation collapsed to single spaces, whitespace runs
//! collapsed, ends trimmed. Surnames additionally drop internal spaces so
//! multi-word surnames ("van der Berg") compare as one token.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize free text for comparison. Total and idempotent; empty or
/// whitespace-only input yields an empty string.
pub fn normalize_text(value: &str) -> String {
    let lowered = value.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lowered, " ");
    WS.replace_all(&stripped, " ").trim().to_string()
}

/// Normalize an author surname: [`normalize_text`] plus removal of internal
/// spaces, so "Van Der Berg" and "vanderberg" compare equal.
pub fn normalize_last_name(value: &str) -> String {
    normalize_text(value).replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_removes_punctuation_and_extra_spaces() {
        assert_eq!(
            normalize_text("  CRISPR-Cas9, in   Biotech! "),
            "crispr cas9 in biotech"
        );
    }

    #[test]
    fn test_normalize_text_idempotent() {
        let once = normalize_text("  CRISPR-Cas9, in   Biotech! ");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_normalize_text_empty_and_whitespace() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \t\n "), "");
        assert_eq!(normalize_text("!!!"), "");
    }

    #[test]
    fn test_normalize_last_name_collapses_internal_spaces() {
        assert_eq!(normalize_last_name("Van Der Berg"), "vanderberg");
        assert_eq!(normalize_last_name("O'Brien"), "obrien");
    }

    #[test]
    fn test_normalize_last_name_empty() {
        assert_eq!(normalize_last_name("  "), "");
    }
}

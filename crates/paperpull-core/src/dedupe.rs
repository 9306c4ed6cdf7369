//! Candidate-URL deduplication.
//!
//! Keeps only http(s) URLs with a host, deduplicates by canonical parsed
//! form, and preserves first-seen order.

use std::collections::HashSet;

use url::Url;

pub fn dedupe_urls(urls: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut deduped = Vec::new();

    for raw in urls {
        let Ok(parsed) = Url::parse(raw) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            continue;
        }
        let cleaned = parsed.to_string();
        if seen.insert(cleaned.clone()) {
            deduped.push(cleaned);
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_keeps_only_http_and_https() {
        let urls = owned(&[
            "https://example.org/a.pdf",
            "https://example.org/a.pdf",
            "http://example.org/b.pdf",
            "ftp://example.org/not-allowed.pdf",
            "javascript:alert(1)",
        ]);
        assert_eq!(
            dedupe_urls(&urls),
            owned(&["https://example.org/a.pdf", "http://example.org/b.pdf"])
        );
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let urls = owned(&[
            "https://example.org/c.pdf",
            "https://example.org/a.pdf",
            "https://example.org/c.pdf",
            "https://example.org/b.pdf",
        ]);
        assert_eq!(
            dedupe_urls(&urls),
            owned(&[
                "https://example.org/c.pdf",
                "https://example.org/a.pdf",
                "https://example.org/b.pdf",
            ])
        );
    }

    #[test]
    fn test_drops_unparseable_entries() {
        let urls = owned(&["not a url", "", "https://example.org/ok.pdf"]);
        assert_eq!(dedupe_urls(&urls), owned(&["https://example.org/ok.pdf"]));
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe_urls(&[]).is_empty());
    }
}

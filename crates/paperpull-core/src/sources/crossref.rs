//! Crossref works adapter (metadata registry).
//!
//! One search per lookup against `/works?query.title=…`, scored with the
//! title-similarity ratio plus author bonuses: +0.30 when the first author's
//! surname matches the query, +0.10 when any other listed author matches,
//! −0.05 when an author list is present but no surname matches at all.

use serde::Deserialize;

use super::{PaperMatch, PaperQuery, SourceOutcome, null_to_default, round_score};
use crate::dedupe::dedupe_urls;
use crate::matching::{select_best, title_similarity};
use crate::text::normalize_last_name;

const WORKS_URL: &str = "https://api.crossref.org/works";

#[derive(Debug, Default, Deserialize)]
struct WorksResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    message: WorksMessage,
}

#[derive(Debug, Default, Deserialize)]
struct WorksMessage {
    #[serde(default, deserialize_with = "null_to_default")]
    items: Vec<Work>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Work {
    #[serde(default, deserialize_with = "null_to_default")]
    title: Vec<String>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
    publisher: Option<String>,
    issued: Option<IssuedDate>,
    #[serde(default, deserialize_with = "null_to_default")]
    author: Vec<Author>,
    #[serde(default, deserialize_with = "null_to_default")]
    link: Vec<TypedLink>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct IssuedDate {
    #[serde(rename = "date-parts", default, deserialize_with = "null_to_default")]
    date_parts: Vec<Option<Vec<Option<i64>>>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Author {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct TypedLink {
    #[serde(rename = "URL", default, deserialize_with = "null_to_default")]
    url: String,
    #[serde(rename = "content-type")]
    content_type: Option<String>,
}

impl Work {
    fn candidate_title(&self) -> &str {
        self.title.first().map(String::as_str).unwrap_or("")
    }

    fn year(&self) -> Option<String> {
        let row = self.issued.as_ref()?.date_parts.first()?.as_ref()?;
        let year = row.first().copied()??;
        Some(year.to_string())
    }
}

fn score_work(work: &Work, query: &PaperQuery) -> f64 {
    let base = title_similarity(work.candidate_title(), &query.title);

    let target = normalize_last_name(&query.first_author_last_name);
    if target.is_empty() {
        return base;
    }
    if work.author.is_empty() {
        return base;
    }

    let first_author = work
        .author
        .first()
        .and_then(|a| a.family.as_deref())
        .map(normalize_last_name)
        .unwrap_or_default();
    if !first_author.is_empty() && first_author == target {
        return base + 0.30;
    }

    let any_author_matches = work
        .author
        .iter()
        .any(|a| a.family.as_deref().is_some_and(|f| normalize_last_name(f) == target));
    if any_author_matches {
        return base + 0.10;
    }

    base - 0.05
}

/// Keep only links whose declared content type contains "pdf", in encounter
/// order, with scheme filtering and exact duplicates removed.
fn extract_pdf_links(work: &Work) -> Vec<String> {
    let urls: Vec<String> = work
        .link
        .iter()
        .filter(|link| {
            !link.url.is_empty()
                && link
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| ct.to_lowercase().contains("pdf"))
        })
        .map(|link| link.url.clone())
        .collect();
    dedupe_urls(&urls)
}

/// Format authors as "given family" display names and capture the first
/// author's family name.
fn format_authors(work: &Work) -> (Vec<String>, Option<String>) {
    let mut formatted = Vec::new();
    let mut first_family = None;

    for (index, author) in work.author.iter().enumerate() {
        let given = author.given.as_deref().unwrap_or("").trim();
        let family = author.family.as_deref().unwrap_or("").trim();
        if index == 0 && !family.is_empty() {
            first_family = Some(family.to_string());
        }
        let name = [given, family]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            formatted.push(name);
        }
    }
    (formatted, first_family)
}

fn build_match(work: &Work, score: f64) -> PaperMatch {
    let (authors, first_author_last_name) = format_authors(work);
    PaperMatch {
        source: "crossref".to_string(),
        title: work.candidate_title().to_string(),
        doi: work.doi.clone(),
        publisher: work.publisher.clone(),
        journal: None,
        year: work.year(),
        authors,
        first_author_last_name,
        score: round_score(score),
        pdf_urls: extract_pdf_links(work),
        is_open_access: None,
    }
}

/// Query Crossref and pick the best-scoring work. Any transport or HTTP
/// failure degrades to [`SourceOutcome::NoMatch`].
pub async fn fetch_match(client: &reqwest::Client, query: &PaperQuery) -> SourceOutcome {
    let url = format!(
        "{WORKS_URL}?query.title={}&rows=15",
        urlencoding::encode(&query.title)
    );

    let response = match client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(error = %e, "Crossref request failed; treating as no match");
            return SourceOutcome::NoMatch;
        }
    };
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "Crossref returned non-success status");
        return SourceOutcome::NoMatch;
    }

    let payload: WorksResponse = match response.json().await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "Crossref payload did not parse");
            return SourceOutcome::NoMatch;
        }
    };

    match select_best(&payload.message.items, |work| score_work(work, query)) {
        Some((work, score)) => SourceOutcome::Found(build_match(work, score)),
        None => SourceOutcome::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn work(value: serde_json::Value) -> Work {
        serde_json::from_value(value).unwrap()
    }

    fn query(title: &str, surname: &str) -> PaperQuery {
        PaperQuery {
            title: title.to_string(),
            first_author_last_name: surname.to_string(),
        }
    }

    // ── Scoring ─────────────────────────────────────────────────────────

    #[test]
    fn test_first_author_match_gets_large_bonus() {
        let w = work(json!({
            "title": ["Gene drives in mosquito populations"],
            "author": [{"family": "Miller"}, {"family": "Chen"}],
        }));
        let q = query("Gene drives in mosquito populations", "Miller");
        assert_eq!(score_work(&w, &q), 1.30);
    }

    #[test]
    fn test_other_author_match_gets_small_bonus() {
        let w = work(json!({
            "title": ["Gene drives in mosquito populations"],
            "author": [{"family": "Chen"}, {"family": "Miller"}],
        }));
        let q = query("Gene drives in mosquito populations", "Miller");
        assert_eq!(score_work(&w, &q), 1.10);
    }

    #[test]
    fn test_no_author_match_is_penalized() {
        let w = work(json!({
            "title": ["Gene drives in mosquito populations"],
            "author": [{"family": "Chen"}],
        }));
        let q = query("Gene drives in mosquito populations", "Miller");
        assert_eq!(score_work(&w, &q), 0.95);
    }

    #[test]
    fn test_missing_author_list_scores_plain_base() {
        let w = work(json!({"title": ["Gene drives in mosquito populations"]}));
        let q = query("Gene drives in mosquito populations", "Miller");
        assert_eq!(score_work(&w, &q), 1.0);
    }

    #[test]
    fn test_empty_query_surname_scores_plain_base() {
        let w = work(json!({
            "title": ["Gene drives in mosquito populations"],
            "author": [{"family": "Chen"}],
        }));
        let q = query("Gene drives in mosquito populations", "  ");
        assert_eq!(score_work(&w, &q), 1.0);
    }

    // ── Selection ───────────────────────────────────────────────────────

    #[test]
    fn test_select_best_uses_title_and_author() {
        let items = vec![
            work(json!({
                "title": ["A study that should not match"],
                "author": [{"family": "Wrong"}],
                "DOI": "10.1000/nope",
            })),
            work(json!({
                "title": ["Editing CAR-T cells with CRISPR-Cas9 improves persistence"],
                "author": [{"family": "Miller"}],
                "DOI": "10.1000/match",
            })),
        ];
        let q = query(
            "Editing CAR-T cells with CRISPR Cas9 improves persistence",
            "Miller",
        );

        let (best, score) = select_best(&items, |w| score_work(w, &q)).unwrap();
        assert_eq!(best.doi.as_deref(), Some("10.1000/match"));
        assert!(score > 0.8, "got {score}");
    }

    // ── PDF link extraction ─────────────────────────────────────────────

    #[test]
    fn test_extract_pdf_links_filters_and_dedupes() {
        let w = work(json!({
            "link": [
                {"URL": "https://example.org/file.pdf", "content-type": "application/pdf"},
                {"URL": "https://example.org/xml", "content-type": "text/xml"},
                {"URL": "https://example.org/dup.pdf", "content-type": "application/pdf"},
                {"URL": "https://example.org/dup.pdf", "content-type": "application/pdf"},
            ]
        }));
        assert_eq!(
            extract_pdf_links(&w),
            vec![
                "https://example.org/file.pdf".to_string(),
                "https://example.org/dup.pdf".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_pdf_links_tolerates_missing_fields() {
        let w = work(json!({"link": [{}, {"URL": "https://example.org/a.pdf"}]}));
        assert!(extract_pdf_links(&w).is_empty());
    }

    // ── Match building ──────────────────────────────────────────────────

    #[test]
    fn test_build_match_formats_authors_and_year() {
        let w = work(json!({
            "title": ["Base editing of stem cells"],
            "DOI": "10.1000/base",
            "publisher": "Example Press",
            "issued": {"date-parts": [[2023, 5]]},
            "author": [
                {"given": "Ana", "family": "Miller"},
                {"given": "Wei", "family": "Chen"},
                {"given": "", "family": ""},
            ],
        }));
        let m = build_match(&w, 1.2987);

        assert_eq!(m.source, "crossref");
        assert_eq!(m.title, "Base editing of stem cells");
        assert_eq!(m.doi.as_deref(), Some("10.1000/base"));
        assert_eq!(m.publisher.as_deref(), Some("Example Press"));
        assert_eq!(m.year.as_deref(), Some("2023"));
        assert_eq!(m.authors, vec!["Ana Miller", "Wei Chen"]);
        assert_eq!(m.first_author_last_name.as_deref(), Some("Miller"));
        assert_eq!(m.score, 1.299);
        assert!(m.journal.is_none());
        assert!(m.is_open_access.is_none());
    }

    #[test]
    fn test_year_tolerates_null_date_parts() {
        let w = work(json!({"issued": {"date-parts": [[null]]}}));
        assert!(w.year().is_none());
        let w = work(json!({"issued": {"date-parts": [null]}}));
        assert!(w.year().is_none());
        let w = work(json!({"issued": {"date-parts": null}}));
        assert!(w.year().is_none());
        let w = work(json!({"issued": {"date-parts": []}}));
        assert!(w.year().is_none());
    }

    #[test]
    fn test_empty_payload_deserializes() {
        let payload: WorksResponse = serde_json::from_value(json!({})).unwrap();
        assert!(payload.message.items.is_empty());
    }

    // Crossref emits explicit nulls where lists would go; they must read as
    // empty rather than rejecting the record.

    #[test]
    fn test_null_author_and_link_fields_parse_as_empty() {
        let w = work(json!({
            "title": ["Gene drives in mosquito populations"],
            "author": null,
            "link": null,
        }));
        let q = query("Gene drives in mosquito populations", "Miller");
        assert_eq!(score_work(&w, &q), 1.0);
        assert!(extract_pdf_links(&w).is_empty());
    }

    #[test]
    fn test_null_title_and_url_fields_parse_as_empty() {
        let w = work(json!({
            "title": null,
            "link": [{"URL": null, "content-type": "application/pdf"}],
        }));
        assert_eq!(w.candidate_title(), "");
        assert!(extract_pdf_links(&w).is_empty());
    }

    #[test]
    fn test_null_message_parses_as_empty() {
        let payload: WorksResponse = serde_json::from_value(json!({"message": null})).unwrap();
        assert!(payload.message.items.is_empty());
        let payload: WorksResponse =
            serde_json::from_value(json!({"message": {"items": null}})).unwrap();
        assert!(payload.message.items.is_empty());
    }
}

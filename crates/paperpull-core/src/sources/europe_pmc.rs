//! Europe PMC adapter (life-sciences literature index).
//!
//! The search query embeds both a title-phrase clause and an author clause.
//! Scoring only checks the `firstAuthor` field (surname comes first in
//! Europe PMC author strings); unlike the Crossref adapter there is no
//! fallback scan over the author list and no mismatch penalty.

use serde::Deserialize;

use super::{PaperMatch, PaperQuery, SourceOutcome, null_to_default, round_score};
use crate::matching::{select_best, title_similarity};
use crate::text::normalize_last_name;

const SEARCH_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(rename = "resultList", default, deserialize_with = "null_to_default")]
    result_list: ResultList,
}

#[derive(Debug, Default, Deserialize)]
struct ResultList {
    #[serde(default, deserialize_with = "null_to_default")]
    result: Vec<SearchResult>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct SearchResult {
    #[serde(default, deserialize_with = "null_to_default")]
    title: String,
    doi: Option<String>,
    #[serde(rename = "journalTitle")]
    journal_title: Option<String>,
    #[serde(rename = "pubYear")]
    pub_year: Option<String>,
    #[serde(rename = "authorString")]
    author_string: Option<String>,
    #[serde(rename = "firstAuthor")]
    first_author: Option<String>,
    #[serde(rename = "isOpenAccess")]
    is_open_access: Option<String>,
    pmcid: Option<String>,
    #[serde(rename = "fullTextUrlList", default, deserialize_with = "null_to_default")]
    full_text_url_list: FullTextUrlList,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct FullTextUrlList {
    #[serde(rename = "fullTextUrl", default, deserialize_with = "null_to_default")]
    full_text_url: Vec<FullTextUrl>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct FullTextUrl {
    #[serde(default, deserialize_with = "null_to_default")]
    url: String,
    #[serde(rename = "documentStyle")]
    document_style: Option<String>,
}

fn score_result(result: &SearchResult, query: &PaperQuery) -> f64 {
    let base = title_similarity(&result.title, &query.title);

    let target = normalize_last_name(&query.first_author_last_name);
    if target.is_empty() {
        return base;
    }

    // Europe PMC puts the surname first in "Miller AB"-style strings.
    let first_author = result
        .first_author
        .as_deref()
        .unwrap_or("")
        .trim()
        .split(' ')
        .next()
        .map(normalize_last_name)
        .unwrap_or_default();
    if !first_author.is_empty() && first_author == target {
        return base + 0.30;
    }
    base
}

/// First full-text entry explicitly styled "pdf" or whose URL ends in
/// ".pdf"; otherwise a viewer URL synthesized from the PMCID if one exists.
fn extract_pdf_url(result: &SearchResult) -> Option<String> {
    for entry in &result.full_text_url_list.full_text_url {
        if entry.url.is_empty() {
            continue;
        }
        let style = entry
            .document_style
            .as_deref()
            .unwrap_or("")
            .to_lowercase();
        if style == "pdf" || entry.url.to_lowercase().ends_with(".pdf") {
            return Some(entry.url.clone());
        }
    }

    let pmcid = result.pmcid.as_deref().unwrap_or("").trim();
    if !pmcid.is_empty() {
        return Some(format!("https://europepmc.org/articles/{pmcid}?pdf=render"));
    }
    None
}

fn build_match(result: &SearchResult, score: f64) -> PaperMatch {
    PaperMatch {
        source: "europe_pmc".to_string(),
        title: result.title.clone(),
        doi: result.doi.clone(),
        publisher: None,
        journal: result.journal_title.clone(),
        year: result.pub_year.clone(),
        authors: result
            .author_string
            .clone()
            .filter(|s| !s.is_empty())
            .map(|s| vec![s])
            .unwrap_or_default(),
        first_author_last_name: result.first_author.clone(),
        score: round_score(score),
        pdf_urls: extract_pdf_url(result).into_iter().collect(),
        is_open_access: Some(
            result
                .is_open_access
                .as_deref()
                .is_some_and(|flag| flag.eq_ignore_ascii_case("y")),
        ),
    }
}

/// Query Europe PMC and pick the best-scoring result. Any transport or HTTP
/// failure degrades to [`SourceOutcome::NoMatch`].
pub async fn fetch_match(client: &reqwest::Client, query: &PaperQuery) -> SourceOutcome {
    let search_query = format!(
        "TITLE:\"{}\" AND AUTH:\"{}\"",
        query.title, query.first_author_last_name
    );

    let response = match client
        .get(SEARCH_URL)
        .query(&[
            ("query", search_query.as_str()),
            ("format", "json"),
            ("pageSize", "15"),
        ])
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(error = %e, "Europe PMC request failed; treating as no match");
            return SourceOutcome::NoMatch;
        }
    };
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "Europe PMC returned non-success status");
        return SourceOutcome::NoMatch;
    }

    let payload: SearchResponse = match response.json().await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "Europe PMC payload did not parse");
            return SourceOutcome::NoMatch;
        }
    };

    match select_best(&payload.result_list.result, |result| {
        score_result(result, query)
    }) {
        Some((result, score)) => SourceOutcome::Found(build_match(result, score)),
        None => SourceOutcome::NoMatch,
    }
}

//! Discovery orchestration.
//!
//! Sequences the two metadata sources, arbitrates a primary match, resolves
//! a DOI for the open-access lookup, collects candidate full-text URLs in a
//! fixed order (Europe PMC PDF, Crossref PDF links, Unpaywall URL), and
//! deduplicates them. The two source calls are independent; they run
//! sequentially since correctness does not depend on ordering.

use std::time::Duration;

use crate::config::{Config, UNPAYWALL_EMAIL_WARNING};
use crate::dedupe::dedupe_urls;
use crate::sources::{PaperMatch, PaperQuery, SourceOutcome, crossref, europe_pmc, unpaywall};

/// User agent sent on every upstream call.
pub const USER_AGENT: &str = "PaperPull/0.1";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(20);
const LOOKUP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Everything a lookup produced. The raw per-source outcomes are kept for
/// transparency and debugging alongside the arbitrated primary match.
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    pub primary: Option<PaperMatch>,
    pub candidate_urls: Vec<String>,
    pub warnings: Vec<String>,
    pub crossref: SourceOutcome,
    pub europe_pmc: SourceOutcome,
}

/// Shared client for the metadata calls of one lookup: bounded timeouts so
/// a stalled upstream cannot block the request indefinitely.
pub fn lookup_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(LOOKUP_TIMEOUT)
        .connect_timeout(LOOKUP_CONNECT_TIMEOUT)
        .build()
}

/// Client for proxying the actual file download; file transfers get a much
/// longer total timeout than metadata calls.
pub fn download_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DOWNLOAD_TIMEOUT)
        .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
        .build()
}

/// Both present → higher score wins, ties favor Crossref (strict
/// greater-than on the Europe PMC side). One present → it. Neither → none.
fn pick_primary(crossref: &SourceOutcome, europe_pmc: &SourceOutcome) -> Option<PaperMatch> {
    match (crossref.as_match(), europe_pmc.as_match()) {
        (Some(cr), Some(ep)) => {
            if ep.score > cr.score {
                Some(ep.clone())
            } else {
                Some(cr.clone())
            }
        }
        (Some(cr), None) => Some(cr.clone()),
        (None, Some(ep)) => Some(ep.clone()),
        (None, None) => None,
    }
}

/// Run one full lookup against all sources.
pub async fn discover(
    query: &PaperQuery,
    config: &Config,
    client: &reqwest::Client,
) -> DiscoveryResult {
    let crossref_outcome = crossref::fetch_match(client, query).await;
    let europe_pmc_outcome = europe_pmc::fetch_match(client, query).await;

    let primary = pick_primary(&crossref_outcome, &europe_pmc_outcome);

    // DOI for the open-access lookup: primary's, falling back to Crossref's.
    let doi = primary
        .as_ref()
        .and_then(|m| m.doi.clone())
        .or_else(|| crossref_outcome.as_match().and_then(|m| m.doi.clone()));

    let mut candidate_urls: Vec<String> = Vec::new();
    if let Some(ep) = europe_pmc_outcome.as_match() {
        candidate_urls.extend(ep.pdf_urls.iter().cloned());
    }
    if let Some(cr) = crossref_outcome.as_match() {
        candidate_urls.extend(cr.pdf_urls.iter().cloned());
    }

    let mut warnings = Vec::new();
    match (&doi, &config.unpaywall_email) {
        (Some(doi), Some(email)) => {
            if let Some(url) = unpaywall::fetch_pdf_url(client, doi, email).await {
                candidate_urls.push(url);
            }
        }
        (Some(_), None) => warnings.push(UNPAYWALL_EMAIL_WARNING.to_string()),
        (None, _) => {}
    }

    DiscoveryResult {
        primary,
        candidate_urls: dedupe_urls(&candidate_urls),
        warnings,
        crossref: crossref_outcome,
        europe_pmc: europe_pmc_outcome,
    }
}

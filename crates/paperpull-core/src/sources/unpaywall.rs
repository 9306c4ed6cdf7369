//! Unpaywall adapter (DOI-keyed open-access resolver).
//!
//! Only called when a DOI and an operator contact address are both known.
//! A 404 means "no open-access record for this DOI" and is not an error;
//! any transport failure likewise degrades to no URL.

use serde::Deserialize;

use super::null_to_default;

#[derive(Debug, Default, Deserialize)]
struct OaRecord {
    best_oa_location: Option<OaLocation>,
    #[serde(default, deserialize_with = "null_to_default")]
    oa_locations: Vec<OaLocation>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct OaLocation {
    url_for_pdf: Option<String>,
    url: Option<String>,
}

impl OaLocation {
    fn best_url(&self) -> Option<String> {
        self.url_for_pdf
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| self.url.clone().filter(|u| !u.is_empty()))
    }
}

/// Preference order: the best location's direct PDF URL, its generic URL,
/// then the first URL found scanning all listed locations.
fn pick_oa_url(record: &OaRecord) -> Option<String> {
    if let Some(url) = record.best_oa_location.as_ref().and_then(OaLocation::best_url) {
        return Some(url);
    }
    record.oa_locations.iter().find_map(OaLocation::best_url)
}

/// Resolve the best-known legal full-text URL for a DOI, or `None`.
pub async fn fetch_pdf_url(client: &reqwest::Client, doi: &str, email: &str) -> Option<String> {
    if doi.is_empty() || email.is_empty() {
        return None;
    }

    let url = format!("https://api.unpaywall.org/v2/{doi}");
    let response = match client.get(&url).query(&[("email", email)]).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(error = %e, "Unpaywall request failed; skipping");
            return None;
        }
    };

    // 404 means no OA record for this DOI, not a failure.
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return None;
    }
    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "Unpaywall returned non-success status");
        return None;
    }

    let record: OaRecord = match response.json().await {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "Unpaywall payload did not parse");
            return None;
        }
    };
    pick_oa_url(&record)
}

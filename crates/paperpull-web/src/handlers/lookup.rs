use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use paperpull_core::{DiscoveryResult, PaperQuery, TokenStore, discover, lookup_client};

use crate::models::{
    DownloadInfo, LookupRequest, LookupResponse, SURNAME_MAX, SURNAME_MIN, TITLE_MAX, TITLE_MIN,
};
use crate::state::AppState;

const NO_MATCH_DETAIL: &str =
    "No likely match found in the currently configured legal-access sources.";

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": message }))).into_response()
}

pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LookupRequest>,
) -> Response {
    // Expired tokens are purged lazily on every lookup and download call.
    state.tokens.sweep();

    let title = req.title.trim().to_string();
    let surname = req.first_author_last_name.trim().to_string();

    if !(TITLE_MIN..=TITLE_MAX).contains(&title.chars().count()) {
        return detail(
            StatusCode::BAD_REQUEST,
            "title must be between 5 and 500 characters",
        );
    }
    if !(SURNAME_MIN..=SURNAME_MAX).contains(&surname.chars().count()) {
        return detail(
            StatusCode::BAD_REQUEST,
            "first_author_last_name must be between 2 and 100 characters",
        );
    }

    let client = match lookup_client() {
        Ok(client) => client,
        Err(e) => {
            return detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to build HTTP client: {e}"),
            );
        }
    };

    let query = PaperQuery {
        title: title.clone(),
        first_author_last_name: surname,
    };
    let result = discover(&query, &state.config, &client).await;

    match build_lookup_response(result, &title, state.tokens.as_ref()) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err((status, message)) => detail(status, message),
    }
}

/// Turn a discovery result into the lookup response, registering a download
/// token for the first candidate URL. No match and no candidate URLs at all
/// is a not-found condition.
fn build_lookup_response(
    result: DiscoveryResult,
    fallback_title: &str,
    tokens: &dyn TokenStore,
) -> Result<LookupResponse, (StatusCode, &'static str)> {
    if result.primary.is_none() && result.candidate_urls.is_empty() {
        return Err((StatusCode::NOT_FOUND, NO_MATCH_DETAIL));
    }

    let download = result.candidate_urls.first().map(|url| {
        let filename_source = result
            .primary
            .as_ref()
            .map(|m| m.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback_title);
        let token = tokens.register(url, filename_source);
        let endpoint = format!("/api/download/{token}");
        DownloadInfo { token, endpoint }
    });

    Ok(LookupResponse {
        download_available: download.is_some(),
        primary: result.primary,
        candidate_urls: result.candidate_urls,
        download,
        warnings: result.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperpull_core::{MemoryTokenStore, SourceOutcome};

    fn empty_result() -> DiscoveryResult {
        DiscoveryResult {
            primary: None,
            candidate_urls: vec![],
            warnings: vec![],
            crossref: SourceOutcome::NoMatch,
            europe_pmc: SourceOutcome::NoMatch,
        }
    }

    #[test]
    fn test_no_match_anywhere_is_not_found() {
        let store = MemoryTokenStore::new();
        let err = build_lookup_response(empty_result(), "Some title", &store).unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_candidate_urls_register_a_download_token() {
        let store = MemoryTokenStore::new();
        let result = DiscoveryResult {
            candidate_urls: vec![
                "https://example.org/a.pdf".to_string(),
                "https://example.org/b.pdf".to_string(),
            ],
            ..empty_result()
        };

        let body = build_lookup_response(result, "Fallback title", &store).unwrap();
        assert!(body.download_available);
        let download = body.download.unwrap();
        assert_eq!(download.endpoint, format!("/api/download/{}", download.token));

        let entry = store.get(&download.token).unwrap();
        assert_eq!(entry.url, "https://example.org/a.pdf");
        assert_eq!(entry.filename, "Fallback_title.pdf");
    }

    #[test]
    fn test_match_without_urls_returns_ok_without_download() {
        let store = MemoryTokenStore::new();
        let result = DiscoveryResult {
            primary: Some(paperpull_core::PaperMatch {
                source: "crossref".to_string(),
                title: "A matched title".to_string(),
                doi: None,
                publisher: None,
                journal: None,
                year: None,
                authors: vec![],
                first_author_last_name: None,
                score: 0.9,
                pdf_urls: vec![],
                is_open_access: None,
            }),
            ..empty_result()
        };

        let body = build_lookup_response(result, "Fallback title", &store).unwrap();
        assert!(!body.download_available);
        assert!(body.download.is_none());
        assert!(body.candidate_urls.is_empty());
    }
}

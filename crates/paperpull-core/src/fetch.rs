//! One-shot full-text fetch for the download proxy.
//!
//! Unlike the source adapters, a failure here is surfaced to the caller
//! (the web layer maps it to a gateway error) rather than absorbed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::CoreError;
use crate::tokens::sanitize_filename;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

static CD_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).unwrap());

/// A fetched upstream file with the metadata the download endpoint needs.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Sanitized filename from the upstream Content-Disposition header, if
    /// one was declared.
    pub filename: Option<String>,
}

/// Extract and sanitize the filename from a Content-Disposition header.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let captured = CD_FILENAME.captures(header)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        return None;
    }
    Some(sanitize_filename(captured))
}

/// Fetch a previously resolved full-text URL. Non-2xx statuses and
/// transport failures are returned as errors for the caller to surface.
pub async fn fetch_full_text(
    client: &reqwest::Client,
    url: &str,
) -> Result<FetchedFile, CoreError> {
    let response = client.get(url).send().await?.error_for_status()?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let filename = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(filename_from_content_disposition);

    let bytes = response.bytes().await?;
    Ok(FetchedFile {
        bytes: bytes.to_vec(),
        content_type,
        filename,
    })
}

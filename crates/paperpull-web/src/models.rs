use paperpull_core::PaperMatch;
use serde::{Deserialize, Serialize};

/// Bounds enforced on lookup input.
pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 500;
pub const SURNAME_MIN: usize = 2;
pub const SURNAME_MAX: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub title: String,
    pub first_author_last_name: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadInfo {
    pub token: String,
    pub endpoint: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    #[serde(rename = "match")]
    pub primary: Option<PaperMatch>,
    pub candidate_urls: Vec<String>,
    pub download_available: bool,
    pub download: Option<DownloadInfo>,
    pub warnings: Vec<String>,
}

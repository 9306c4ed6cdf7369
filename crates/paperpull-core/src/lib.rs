use thiserror::Error;

pub mod config;
pub mod dedupe;
pub mod discover;
pub mod fetch;
pub mod matching;
pub mod sources;
pub mod text;
pub mod tokens;

// Re-export for convenience
pub use config::Config;
pub use dedupe::dedupe_urls;
pub use discover::{DiscoveryResult, USER_AGENT, discover, download_client, lookup_client};
pub use fetch::{FetchedFile, fetch_full_text};
pub use matching::{MATCH_THRESHOLD, select_best, title_similarity};
pub use sources::{PaperMatch, PaperQuery, SourceOutcome};
pub use tokens::{
    DOWNLOAD_TTL, DownloadEntry, MemoryTokenStore, TokenStore, sanitize_filename,
};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

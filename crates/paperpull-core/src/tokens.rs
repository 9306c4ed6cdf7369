//! Short-lived download tokens.
//!
//! A successful lookup with at least one candidate URL registers the first
//! URL under an opaque token so the client can fetch the file without
//! re-running lookup or seeing the raw URL. Entries expire
//! [`DOWNLOAD_TTL`] after creation and are purged lazily on every lookup
//! and download call — there is no background timer. Reads do not consume
//! the entry, so a token may be used more than once until expiry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Time-to-live for a registered download: 30 minutes.
pub const DOWNLOAD_TTL: Duration = Duration::from_secs(30 * 60);

const MAX_FILENAME_LEN: usize = 140;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").unwrap());

/// A resolved URL held behind a token.
#[derive(Debug, Clone)]
pub struct DownloadEntry {
    pub url: String,
    pub filename: String,
    pub created_at: Instant,
}

/// Store abstraction for download tokens, so the in-memory map can be
/// swapped for an external cache in a multi-instance deployment. All
/// operations must be safe under concurrent insert/read/expire.
pub trait TokenStore: Send + Sync {
    /// Register a URL under a fresh token, pruning expired entries first.
    /// The filename is sanitized before storage.
    fn register(&self, url: &str, filename: &str) -> String;

    /// Look up a token. Returns `None` for unknown or expired tokens.
    /// Does not consume the entry.
    fn get(&self, token: &str) -> Option<DownloadEntry>;

    /// Purge expired entries.
    fn sweep(&self);
}

/// Mutex-guarded in-memory token store. Contention is low and every
/// operation is O(1) amortized plus the O(n) expiry sweep.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, DownloadEntry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn register_at(&self, url: &str, filename: &str, now: Instant) -> String {
        self.sweep_at(now);
        let token = Uuid::new_v4().simple().to_string();
        let entry = DownloadEntry {
            url: url.to_string(),
            filename: sanitize_filename(filename),
            created_at: now,
        };
        self.entries
            .lock()
            .expect("token store lock poisoned")
            .insert(token.clone(), entry);
        token
    }

    fn get_at(&self, token: &str, now: Instant) -> Option<DownloadEntry> {
        let entries = self.entries.lock().expect("token store lock poisoned");
        entries
            .get(token)
            .filter(|entry| now.duration_since(entry.created_at) <= DOWNLOAD_TTL)
            .cloned()
    }

    fn sweep_at(&self, now: Instant) {
        let mut entries = self.entries.lock().expect("token store lock poisoned");
        entries.retain(|_, entry| now.duration_since(entry.created_at) <= DOWNLOAD_TTL);
    }
}

impl TokenStore for MemoryTokenStore {
    fn register(&self, url: &str, filename: &str) -> String {
        self.register_at(url, filename, Instant::now())
    }

    fn get(&self, token: &str) -> Option<DownloadEntry> {
        self.get_at(token, Instant::now())
    }

    fn sweep(&self) {
        self.sweep_at(Instant::now());
    }
}

/// Build a safe attachment filename from a raw title or upstream-declared
/// name: unsafe character runs become underscores, empty results fall back
/// to "paper", a `.pdf` extension is forced, and the length is capped.
pub fn sanitize_filename(raw: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(raw, "_");
    let cleaned = cleaned.trim_matches('_');
    let mut name = if cleaned.is_empty() {
        "paper".to_string()
    } else {
        cleaned.to_string()
    };
    if !name.to_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name.truncate(MAX_FILENAME_LEN);
    name
}

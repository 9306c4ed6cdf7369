//! Source adapters for the upstream scholarly metadata services.
//!
//! Each adapter issues one search against its upstream endpoint, scores the
//! returned records against the query, and either builds a normalized
//! [`PaperMatch`] or reports [`SourceOutcome::NoMatch`]. Transport and HTTP
//! failures degrade to `NoMatch` inside the adapter; a single source failing
//! never fails the whole lookup.

pub mod crossref;
pub mod europe_pmc;
pub mod unpaywall;

use serde::{Deserialize, Deserializer, Serialize};

/// What the caller is looking for. Both fields are free text and are
/// compared case- and punctuation-insensitively.
#[derive(Debug, Clone)]
pub struct PaperQuery {
    pub title: String,
    pub first_author_last_name: String,
}

/// A normalized candidate record built from one source's best-scoring hit.
/// Immutable once built; `publisher`, `journal`, and `is_open_access` are
/// populated per source.
#[derive(Debug, Clone, Serialize)]
pub struct PaperMatch {
    pub source: String,
    pub title: String,
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    pub year: Option<String>,
    pub authors: Vec<String>,
    pub first_author_last_name: Option<String>,
    /// Combined title-similarity + author-bonus score, rounded to 3 decimals.
    /// The bonus can push this above 1.0; it is deliberately not clamped.
    pub score: f64,
    /// Full-text URL candidates discovered on this record, in encounter order.
    pub pdf_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open_access: Option<bool>,
}

/// Outcome of querying one metadata source. A degraded source (timeout,
/// non-2xx, malformed payload) is indistinguishable from one that
/// legitimately found nothing.
#[derive(Debug, Clone)]
pub enum SourceOutcome {
    Found(PaperMatch),
    NoMatch,
}

impl SourceOutcome {
    pub fn as_match(&self) -> Option<&PaperMatch> {
        match self {
            SourceOutcome::Found(m) => Some(m),
            SourceOutcome::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SourceOutcome::Found(_))
    }
}

/// Round a combined score to 3 decimals for presentation on the built match.
pub(crate) fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Deserialize an explicit JSON `null` as the type's default. The upstream
/// services emit `null` where a list or object would go; `#[serde(default)]`
/// alone only covers keys that are missing entirely.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.87654), 0.877);
        assert_eq!(round_score(1.3), 1.3);
        assert_eq!(round_score(0.0), 0.0);
    }
}

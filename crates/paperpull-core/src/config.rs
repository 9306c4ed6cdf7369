//! Runtime configuration.
//!
//! One environment setting: the operator contact address sent to Unpaywall.
//! Its absence is non-fatal; the Unpaywall call is skipped and a warning is
//! attached to the lookup result instead.

/// Warning attached to a lookup when a DOI is known but no contact address
/// is configured.
pub const UNPAYWALL_EMAIL_WARNING: &str =
    "UNPAYWALL_EMAIL is not set. Add it to increase legal full-text coverage.";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub unpaywall_email: Option<String>,
}

impl Config {
    /// Read configuration from the environment. An empty or
    /// whitespace-only `UNPAYWALL_EMAIL` counts as unset.
    pub fn from_env() -> Self {
        let unpaywall_email = std::env::var("UNPAYWALL_EMAIL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Config { unpaywall_email }
    }
}

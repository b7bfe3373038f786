//! Supabase endpoint configuration parsed from environment variables.

use std::path::PathBuf;

use super::StoreError;

pub const DEFAULT_TABLE: &str = "wallets";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL without a trailing slash, e.g. `https://abc.supabase.co`.
    pub url: String,
    pub anon_key: String,
    pub table: String,
    /// Where the signed-in session is persisted. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
    pub timeouts: Timeouts,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("table", &self.table)
            .field("session_file", &self.session_file)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl SupabaseConfig {
    /// Build a config with defaults for everything but the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the key is blank.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, StoreError> {
        Ok(Self {
            url: normalize_url(url)?,
            anon_key: require_non_blank("SUPABASE_ANON_KEY", anon_key)?,
            table: DEFAULT_TABLE.to_owned(),
            session_file: default_session_file(),
            timeouts: Timeouts::default(),
        })
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `WALLETDECK_TABLE`: default `wallets`
    /// - `WALLETDECK_SESSION_FILE`: default `<config dir>/walletdeck/session.json`
    /// - `WALLETDECK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `WALLETDECK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, StoreError> {
        let url = std::env::var("SUPABASE_URL").map_err(|_| StoreError::Config("SUPABASE_URL not set".into()))?;
        let anon_key =
            std::env::var("SUPABASE_ANON_KEY").map_err(|_| StoreError::Config("SUPABASE_ANON_KEY not set".into()))?;

        let mut config = Self::new(&url, &anon_key)?;
        if let Ok(table) = std::env::var("WALLETDECK_TABLE") {
            config.table = require_non_blank("WALLETDECK_TABLE", &table)?;
        }
        if let Ok(path) = std::env::var("WALLETDECK_SESSION_FILE") {
            config.session_file = Some(PathBuf::from(path));
        }
        config.timeouts = Timeouts {
            request_secs: env_parse_u64("WALLETDECK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("WALLETDECK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(config)
    }
}

/// `<config dir>/walletdeck/session.json`, when the platform has a config dir.
#[must_use]
pub fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("walletdeck").join("session.json"))
}

fn normalize_url(raw: &str) -> Result<String, StoreError> {
    let url = raw.trim().trim_end_matches('/');
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(url.to_owned())
    } else {
        Err(StoreError::Config(format!("SUPABASE_URL must be an http(s) URL, got '{raw}'")))
    }
}

fn require_non_blank(name: &str, value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(StoreError::Config(format!("{name} is empty")))
    } else {
        Ok(value.to_owned())
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

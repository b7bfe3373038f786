//! Supabase adapter: GoTrue for sessions, PostgREST for the wallets table.
//!
//! ARCHITECTURE
//! ============
//! The session lives in a `std::sync::Mutex` that is never held across an
//! await; every authenticated call reads it, refreshing first when the token
//! is about to expire. The session is mirrored to a JSON file so a restart
//! picks it back up the way the browser client reads local storage.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `StoreError::Api` carrying the provider's own
//! message (`msg`, `message`, `error_description` or `error`), which is what
//! alerts show to the user.
//!
//! A failed token refresh ends the session only when the provider rejects
//! the refresh token with a 4xx. Transport errors and 5xx keep the stored
//! session, and the table call that needed it fails on its own.

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use serde_json::Value;

use super::config::SupabaseConfig;
use super::{AuthEvent, CurrentUser, RemoteStore, SessionHandle, SessionListener, SessionListeners, StoreError, Subscription};
use crate::model::{NewWallet, WalletRecord};

/// Refresh the access token when it expires within this many seconds.
const REFRESH_MARGIN_SECS: i64 = 60;

pub struct SupabaseStore {
    http: reqwest::Client,
    config: SupabaseConfig,
    session: Mutex<Option<SessionHandle>>,
    listeners: SessionListeners,
}

impl SupabaseStore {
    /// Build the adapter and load any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SupabaseConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;

        let session = config.session_file.as_deref().and_then(|path| match load_session(path) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "ignoring unreadable session file");
                None
            }
        });
        if session.is_some() {
            tracing::info!("restored persisted session");
        }

        Ok(Self { http, config, session: Mutex::new(session), listeners: SessionListeners::new() })
    }

    fn stored_session(&self) -> Option<SessionHandle> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_session(&self, session: Option<SessionHandle>) {
        if let Some(path) = self.config.session_file.as_deref() {
            let result = match &session {
                Some(s) => save_session(path, s),
                None => remove_session(path),
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, path = %path.display(), "session file not updated");
            }
        }
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Bearer token for table calls: the session token, or the anon key when
    /// signed out (row-level security then hides every row).
    async fn bearer(&self) -> String {
        match self.get_session().await {
            Some(session) => session.access_token,
            None => self.config.anon_key.clone(),
        }
    }

    async fn request_token(&self, grant_type: &str, body: &Value) -> Result<SessionHandle, StoreError> {
        let response = self
            .http
            .post(token_endpoint(&self.config.url, grant_type))
            .header("apikey", &self.config.anon_key)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let text = read_body(response).await?;
        parse_token_response(&text, unix_now())
    }
}

#[async_trait::async_trait]
impl RemoteStore for SupabaseStore {
    async fn get_session(&self) -> Option<SessionHandle> {
        let current = self.stored_session()?;
        if !current.expires_within(unix_now(), REFRESH_MARGIN_SECS) {
            return Some(current);
        }

        let body = serde_json::json!({ "refresh_token": current.refresh_token });
        match self.request_token("refresh_token", &body).await {
            Ok(fresh) => {
                tracing::debug!(user_id = %fresh.user.id, "access token refreshed");
                self.set_session(Some(fresh.clone()));
                self.listeners.emit(AuthEvent::TokenRefreshed, Some(&fresh));
                Some(fresh)
            }
            Err(e) if refresh_rejected(&e) => {
                tracing::warn!(error = %e, "refresh token rejected; signing out locally");
                self.set_session(None);
                self.listeners.emit(AuthEvent::SignedOut, None);
                None
            }
            Err(e) => {
                // Offline or provider trouble: keep the session and retry on the next call.
                tracing::warn!(error = %e, "session refresh failed; keeping current session");
                Some(current)
            }
        }
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), StoreError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session = self.request_token("password", &body).await?;
        tracing::info!(user_id = %session.user.id, "signed in");
        self.set_session(Some(session.clone()));
        self.listeners.emit(AuthEvent::SignedIn, Some(&session));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let result = match self.stored_session() {
            Some(session) => {
                let sent = self
                    .http
                    .post(format!("{}/auth/v1/logout", self.config.url))
                    .header("apikey", &self.config.anon_key)
                    .bearer_auth(&session.access_token)
                    .send()
                    .await
                    .map_err(|e| StoreError::Request(e.to_string()));
                match sent {
                    Ok(response) => read_body(response).await.map(|_| ()),
                    Err(e) => Err(e),
                }
            }
            None => Ok(()),
        };
        self.set_session(None);
        self.listeners.emit(AuthEvent::SignedOut, None);
        result
    }

    async fn current_user(&self) -> Option<CurrentUser> {
        let session = self.get_session().await?;
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.config.url))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
        let text = match response {
            Ok(response) => read_body(response).await,
            Err(e) => Err(StoreError::Request(e.to_string())),
        };
        match text.and_then(|t| serde_json::from_str::<CurrentUser>(&t).map_err(|e| StoreError::Parse(e.to_string()))) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "current user lookup failed");
                None
            }
        }
    }

    async fn list_records(&self) -> Result<Vec<WalletRecord>, StoreError> {
        let bearer = self.bearer().await;
        let response = self
            .http
            .get(table_endpoint(&self.config.url, &self.config.table))
            .query(&list_query())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let text = read_body(response).await?;
        let records: Vec<WalletRecord> = serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        tracing::debug!(count = records.len(), "records listed");
        Ok(records)
    }

    async fn insert_record(&self, record: &NewWallet) -> Result<(), StoreError> {
        let bearer = self.bearer().await;
        let response = self
            .http
            .post(table_endpoint(&self.config.url, &self.config.table))
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(bearer)
            .json(&[record])
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        read_body(response).await?;
        tracing::info!(name = %record.name, "record inserted");
        Ok(())
    }

    async fn delete_record(&self, id: &str) -> Result<(), StoreError> {
        let bearer = self.bearer().await;
        let response = self
            .http
            .delete(table_endpoint(&self.config.url, &self.config.table))
            .query(&delete_query(id))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        read_body(response).await?;
        tracing::info!(%id, "record deleted");
        Ok(())
    }
}

// =============================================================================
// REQUEST HELPERS
// =============================================================================

fn token_endpoint(base: &str, grant_type: &str) -> String {
    format!("{base}/auth/v1/token?grant_type={grant_type}")
}

fn table_endpoint(base: &str, table: &str) -> String {
    format!("{base}/rest/v1/{table}")
}

fn list_query() -> [(&'static str, &'static str); 2] {
    [("select", "*"), ("order", "created_at.desc")]
}

fn delete_query(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

/// Read the body, turning non-2xx statuses into `StoreError::Api`.
async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| StoreError::Request(e.to_string()))?;
    if !(200..300).contains(&status) {
        return Err(StoreError::Api { status, message: error_message(status, &text) });
    }
    Ok(text)
}

/// Pull the human-readable message out of a GoTrue or PostgREST error body.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["msg", "message", "error_description", "error"]
                .into_iter()
                .find_map(|key| json.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_owned))
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Whether a refresh failure means the refresh token itself is no good. Only
/// a 4xx answer from the provider says so; transport errors and 5xx do not.
fn refresh_rejected(error: &StoreError) -> bool {
    matches!(error, StoreError::Api { status, .. } if (400..500).contains(status))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: CurrentUser,
}

fn parse_token_response(body: &str, now: i64) -> Result<SessionHandle, StoreError> {
    let token: TokenResponse = serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))?;
    let expires_at = token.expires_at.or_else(|| token.expires_in.map(|secs| now + secs));
    Ok(SessionHandle {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
        user: token.user,
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

// =============================================================================
// SESSION FILE
// =============================================================================

fn load_session(path: &Path) -> Result<Option<SessionHandle>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::SessionFile(e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::SessionFile(e.to_string())),
    }
}

fn save_session(path: &Path, session: &SessionHandle) -> Result<(), StoreError> {
    use std::io::Write as _;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::SessionFile(e.to_string()))?;
    }
    let json = serde_json::to_vec_pretty(session).map_err(|e| StoreError::SessionFile(e.to_string()))?;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(|e| StoreError::SessionFile(e.to_string()))?;
    file.write_all(&json).map_err(|e| StoreError::SessionFile(e.to_string()))
}

fn remove_session(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::SessionFile(e.to_string())),
    }
}

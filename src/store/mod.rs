//! Remote store boundary: hosted auth plus the `wallets` table.
//!
//! DESIGN
//! ======
//! `RemoteStore` is the whole contract the view layer depends on. The
//! production adapter talks to Supabase over HTTP (`supabase`); tests swap in
//! `test_helpers::MockStore`. The trait is object-safe via `async_trait` so
//! consumers hold an `Arc<dyn RemoteStore>`.

pub mod config;
pub mod listeners;
pub mod supabase;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{NewWallet, WalletRecord};
pub use listeners::{SessionListener, SessionListeners, Subscription};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by remote store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A configuration value is missing or could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// The provider response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The operation needs a signed-in user and there is none.
    #[error("not signed in")]
    NotAuthenticated,

    /// The persisted session file could not be read or written.
    #[error("session file error: {0}")]
    SessionFile(String),
}

impl StoreError {
    /// Text shown to the user in alerts: the provider's own message when
    /// there is one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// SESSION TYPES
// =============================================================================

/// Identity of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Provider proof of an authenticated identity. Opaque to the view layer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds; `None` when the provider did not say.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: CurrentUser,
}

impl SessionHandle {
    /// Whether the access token expires within `margin_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now + margin_secs)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Kind of session transition reported to listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Hosted auth + table operations used by the session controller and the
/// collection view.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// The current session, if any. Never fails: provider trouble reads as
    /// "no session".
    async fn get_session(&self) -> Option<SessionHandle>;

    /// Register a listener for session transitions. Dropping the returned
    /// subscription unregisters it.
    fn on_session_change(&self, listener: SessionListener) -> Subscription;

    /// Password sign-in. On success listeners receive `SignedIn`.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), StoreError>;

    /// End the session. Listeners receive `SignedOut` even if the provider
    /// call fails.
    async fn sign_out(&self) -> Result<(), StoreError>;

    /// The user behind the current session, verified with the provider.
    async fn current_user(&self) -> Option<CurrentUser>;

    /// All records visible to the session, newest first.
    async fn list_records(&self) -> Result<Vec<WalletRecord>, StoreError>;

    /// Insert one record; the store assigns its identifier.
    async fn insert_record(&self, record: &NewWallet) -> Result<(), StoreError>;

    /// Delete one record by identifier.
    async fn delete_record(&self, id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers;

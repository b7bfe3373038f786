//! Session controller: who is signed in, and what the view must do about it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller owns `SessionState` and the provider subscription. Provider
//! callbacks only enqueue a `SessionChange` on a channel; the app loop drains
//! the channel and calls `apply`, which tells it whether to refresh or clear
//! the record list. State is therefore only mutated from the event loop.
//!
//! TRADE-OFFS
//! ==========
//! A successful `login` does not flip `authenticated` itself; the provider's
//! `SignedIn` event does. `logout` flips it unconditionally so the view is
//! cleared even if the provider call fails.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::model::Credentials;
use crate::notify::Notifier;
use crate::store::{AuthEvent, RemoteStore, SessionHandle, Subscription};

/// Authenticated flag plus the provider's handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub session: Option<SessionHandle>,
}

/// A session transition queued by the provider listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub session: Option<SessionHandle>,
}

/// What the record list must do after a session transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEffect {
    Refresh,
    Clear,
}

pub struct SessionController {
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    state: SessionState,
    subscription: Option<Subscription>,
}

impl SessionController {
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier, state: SessionState::default(), subscription: None }
    }

    /// Subscribe to provider transitions (forwarded onto `changes`) and check
    /// once for an existing session.
    ///
    /// Returns `Some(Refresh)` when a session already exists.
    pub async fn init(&mut self, changes: mpsc::UnboundedSender<SessionChange>) -> Option<SessionEffect> {
        let subscription = self.store.on_session_change(Box::new(move |event, session| {
            // The receiver is gone only after teardown; nothing left to notify.
            let _ = changes.send(SessionChange { event, session });
        }));
        self.subscription = Some(subscription);

        let session = self.store.get_session().await;
        self.state.authenticated = session.is_some();
        self.state.session = session;
        tracing::info!(authenticated = self.state.authenticated, "session checked");
        self.state.authenticated.then_some(SessionEffect::Refresh)
    }

    /// Replace the session state from a provider transition.
    pub fn apply(&mut self, change: SessionChange) -> SessionEffect {
        tracing::debug!(event = ?change.event, present = change.session.is_some(), "applying session change");
        self.state.authenticated = change.session.is_some();
        self.state.session = change.session;
        if self.state.authenticated { SessionEffect::Refresh } else { SessionEffect::Clear }
    }

    /// Forward credentials to the provider.
    ///
    /// Failures are alerted with the provider's message and leave the state
    /// untouched. Returns whether the provider accepted the credentials.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        match self.store.sign_in(&credentials.email, &credentials.password).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, email = %credentials.email, "sign-in rejected");
                self.notifier.alert(&e.user_message());
                false
            }
        }
    }

    /// Sign out with the provider, then drop local auth state regardless of
    /// the outcome. The caller clears the record list.
    pub async fn logout(&mut self) {
        if let Err(e) = self.store.sign_out().await {
            tracing::warn!(error = %e, "provider sign-out failed; clearing local session anyway");
        }
        self.state = SessionState::default();
    }

    /// Release the provider subscription. Later transitions are not delivered.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("session subscription released");
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.authenticated
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

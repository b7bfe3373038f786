//! Application state: the session controller, the collection view and the
//! surfaces, driven one `Action` at a time.
//!
//! SYSTEM CONTEXT
//! ==============
//! The binary's event loop owns one `App`. Input lines become `Action`s and go
//! through `dispatch`; provider session transitions arrive on the channel
//! returned by `start` and go through `on_session_change`. Both run on the
//! loop's task, so nothing here needs locking.
//!
//! ERROR HANDLING
//! ==============
//! Every failure a user can act on is alerted through the `Notifier` and
//! leaves the view usable. `dispatch` never fails.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::model::{Chain, Credentials, Platform, WalletRecord};
use crate::notify::Notifier;
use crate::state::collection::CollectionView;
use crate::state::session::{SessionChange, SessionController, SessionEffect};
use crate::store::RemoteStore;
use crate::surfaces::{AddField, AddWalletForm, Clipboard, CopyIndicators, DeleteConfirmation, FormError};

/// Alert shown when a submission finds no signed-in user.
pub const NOT_LOGGED_IN: &str = "You must be logged in to add a wallet";

/// One user intent. Record-targeting actions carry the record id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Login(Credentials),
    Logout,
    Refresh,
    TogglePlatform(Platform),
    ToggleChain(Chain),
    OpenDetail(String),
    CloseDetail,
    OpenAdd,
    CloseAdd,
    SubmitAdd,
    RequestDelete(String),
    ConfirmDelete,
    CancelDelete,
    CopyAddress(String),
}

pub struct App {
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    clipboard: Box<dyn Clipboard>,
    session: SessionController,
    collection: CollectionView,
    detail: Option<String>,
    add_form: Option<AddWalletForm>,
    delete: DeleteConfirmation,
    copied: CopyIndicators,
}

impl App {
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            session: SessionController::new(store.clone(), notifier.clone()),
            collection: CollectionView::new(store.clone(), notifier.clone()),
            store,
            notifier,
            clipboard,
            detail: None,
            add_form: None,
            delete: DeleteConfirmation::default(),
            copied: CopyIndicators::default(),
        }
    }

    /// Subscribe to session transitions and load the list if a session
    /// already exists. The caller feeds the returned receiver back through
    /// `on_session_change`.
    pub async fn start(&mut self) -> mpsc::UnboundedReceiver<SessionChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(effect) = self.session.init(tx).await {
            self.apply_effect(effect).await;
        }
        rx
    }

    pub async fn on_session_change(&mut self, change: SessionChange) {
        let effect = self.session.apply(change);
        self.apply_effect(effect).await;
    }

    async fn apply_effect(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::Refresh => self.collection.refresh().await,
            SessionEffect::Clear => self.close_everything(),
        }
    }

    /// Release the session subscription. No transition is applied afterwards.
    pub fn teardown(&mut self) {
        self.session.teardown();
    }

    pub async fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Login(credentials) => {
                self.session.login(&credentials).await;
            }
            Action::Logout => {
                self.session.logout().await;
                self.close_everything();
            }
            Action::Refresh => self.collection.refresh().await,
            Action::TogglePlatform(platform) => self.collection.toggle_platform(platform),
            Action::ToggleChain(chain) => self.collection.toggle_chain(chain),
            Action::OpenDetail(id) => {
                if self.collection.find(&id).is_some() {
                    self.detail = Some(id);
                }
            }
            Action::CloseDetail => self.detail = None,
            Action::OpenAdd => self.add_form = Some(AddWalletForm::default()),
            Action::CloseAdd => self.add_form = None,
            Action::SubmitAdd => self.submit_add().await,
            Action::RequestDelete(id) => {
                if self.collection.find(&id).is_some() {
                    self.delete.request(&id);
                }
            }
            Action::ConfirmDelete => {
                if let Some(id) = self.delete.confirm() {
                    if self.collection.remove(&id).await && self.detail.as_deref() == Some(id.as_str()) {
                        self.detail = None;
                    }
                }
            }
            Action::CancelDelete => self.delete.cancel(),
            Action::CopyAddress(id) => self.copy_address(&id, Instant::now()),
        }
    }

    /// Set one add-form field. Does nothing when the form is closed.
    ///
    /// # Errors
    ///
    /// Returns the form's rejection of a platform or chain name.
    pub fn edit_add(&mut self, field: AddField, value: &str) -> Result<(), FormError> {
        match self.add_form.as_mut() {
            Some(form) => form.set(field, value),
            None => Ok(()),
        }
    }

    async fn submit_add(&mut self) {
        let Some(form) = &self.add_form else { return };
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.notifier.alert(&e.to_string());
                return;
            }
        };
        let Some(user) = self.store.current_user().await else {
            self.notifier.alert(NOT_LOGGED_IN);
            return;
        };
        if self.collection.add(&draft.into_new_wallet(user.id)).await {
            self.add_form = None;
        }
    }

    fn copy_address(&mut self, id: &str, now: Instant) {
        let Some(address) = self.collection.find(id).map(|r| r.address.clone()) else { return };
        match self.copied.copy(self.clipboard.as_mut(), id, &address, now) {
            Ok(()) => tracing::debug!(%id, "address copied"),
            Err(e) => {
                tracing::warn!(error = %e, %id, "copy failed");
                self.notifier.alert(&e.to_string());
            }
        }
    }

    fn close_everything(&mut self) {
        self.collection.clear();
        self.detail = None;
        self.add_form = None;
        self.delete.cancel();
    }

    // ===== VIEW ACCESSORS =====

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn signed_in_email(&self) -> Option<&str> {
        self.session.state().session.as_ref().and_then(|s| s.user.email.as_deref())
    }

    #[must_use]
    pub fn collection(&self) -> &CollectionView {
        &self.collection
    }

    #[must_use]
    pub fn detail(&self) -> Option<&WalletRecord> {
        self.detail.as_deref().and_then(|id| self.collection.find(id))
    }

    #[must_use]
    pub fn add_form(&self) -> Option<&AddWalletForm> {
        self.add_form.as_ref()
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<&WalletRecord> {
        self.delete.pending().and_then(|id| self.collection.find(id))
    }

    #[must_use]
    pub fn copied(&self) -> &CopyIndicators {
        &self.copied
    }

    /// Drop expired "Copied!" indicators and report when the next one lapses.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        self.copied.prune(now);
        self.copied.next_expiry(now)
    }
}

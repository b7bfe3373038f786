//! In-memory `RemoteStore` double plus record fixtures.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::{Chain, Platform, Stored};

/// Scriptable store: rows live in a `Vec`, failures are injected per call.
#[derive(Default)]
pub struct MockStore {
    pub rows: Mutex<Vec<WalletRecord>>,
    pub session: Mutex<Option<SessionHandle>>,
    pub listeners: SessionListeners,
    pub fail_sign_in: Mutex<Option<String>>,
    pub fail_list: Mutex<Option<String>>,
    pub fail_insert: Mutex<Option<String>>,
    pub fail_delete: Mutex<Option<String>>,
    pub list_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts with `rows` and an existing session for `u1`.
    #[must_use]
    pub fn signed_in(rows: Vec<WalletRecord>) -> Self {
        let store = Self::new();
        *store.rows.lock().unwrap() = rows;
        *store.session.lock().unwrap() = Some(test_session());
        store
    }

    pub fn fail(slot: &Mutex<Option<String>>, message: &str) {
        *slot.lock().unwrap() = Some(message.to_owned());
    }

    /// Simulate the provider announcing a transition.
    pub fn announce(&self, event: AuthEvent, session: Option<SessionHandle>) {
        *self.session.lock().unwrap() = session.clone();
        self.listeners.emit(event, session.as_ref());
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<(), StoreError> {
        match slot.lock().unwrap().clone() {
            Some(message) => Err(StoreError::Api { status: 400, message }),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RemoteStore for MockStore {
    async fn get_session(&self) -> Option<SessionHandle> {
        self.session.lock().unwrap().clone()
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<(), StoreError> {
        Self::injected(&self.fail_sign_in)?;
        let mut session = test_session();
        session.user.email = Some(email.to_owned());
        self.announce(AuthEvent::SignedIn, Some(session));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.announce(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn current_user(&self) -> Option<CurrentUser> {
        self.session.lock().unwrap().as_ref().map(|s| s.user.clone())
    }

    async fn list_records(&self) -> Result<Vec<WalletRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_list)?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert_record(&self, record: &NewWallet) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_insert)?;
        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let row = WalletRecord {
            id,
            name: record.name.clone(),
            platform: record.platform.into(),
            purpose: record.purpose.clone(),
            chain: record.chain.into(),
            address: record.address.clone(),
            private_key: record.private_key.clone(),
            email: record.email.clone(),
            created_at: None,
        };
        self.rows.lock().unwrap().insert(0, row);
        Ok(())
    }

    async fn delete_record(&self, id: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_delete)?;
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

#[must_use]
pub fn test_session() -> SessionHandle {
    SessionHandle {
        access_token: "access".to_owned(),
        refresh_token: "refresh".to_owned(),
        expires_at: None,
        user: CurrentUser { id: "u1".to_owned(), email: Some("me@example.com".to_owned()) },
    }
}

/// A minimal record with the given id, platform and chain.
#[must_use]
pub fn record(id: &str, platform: Platform, chain: Chain) -> WalletRecord {
    WalletRecord {
        id: id.to_owned(),
        name: format!("wallet {id}"),
        platform: Stored::Known(platform),
        purpose: "testing".to_owned(),
        chain: Stored::Known(chain),
        address: format!("addr-{id}"),
        private_key: None,
        email: None,
        created_at: None,
    }
}

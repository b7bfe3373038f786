//! In-memory record list, filter selection and the store round-trips that
//! change them.
//!
//! DESIGN
//! ======
//! Each mutation follows a fixed policy:
//! - `refresh` replaces the whole list, or keeps the old one on error.
//! - `add` inserts remotely and then refreshes; nothing is inserted locally.
//! - `remove` deletes remotely and drops the local entry only on success.
//!
//! A failed refresh is logged and marked `stale` for a passive status line;
//! it is not alerted. Every other failure is alerted.

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::model::{Chain, NewWallet, Platform, Stored, WalletRecord};
use crate::notify::Notifier;
use crate::store::RemoteStore;

/// Selected platforms and chains. An empty set means "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub platforms: BTreeSet<Platform>,
    pub chains: BTreeSet<Chain>,
}

impl FilterSelection {
    pub fn toggle_platform(&mut self, platform: Platform) {
        if !self.platforms.remove(&platform) {
            self.platforms.insert(platform);
        }
    }

    pub fn toggle_chain(&mut self, chain: Chain) {
        if !self.chains.remove(&chain) {
            self.chains.insert(chain);
        }
    }

    /// Whether `record` passes both dimensions.
    #[must_use]
    pub fn matches(&self, record: &WalletRecord) -> bool {
        dimension_matches(&self.platforms, &record.platform) && dimension_matches(&self.chains, &record.chain)
    }
}

fn dimension_matches<T: Ord + Copy>(selected: &BTreeSet<T>, value: &Stored<T>) -> bool {
    selected.is_empty() || value.known().is_some_and(|v| selected.contains(&v))
}

pub struct CollectionView {
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    records: Vec<WalletRecord>,
    selection: FilterSelection,
    stale: Option<String>,
}

impl CollectionView {
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier, records: Vec::new(), selection: FilterSelection::default(), stale: None }
    }

    /// Records in provider order (newest first).
    #[must_use]
    pub fn records(&self) -> &[WalletRecord] {
        &self.records
    }

    #[must_use]
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Last list-fetch error, while the shown list is older than it.
    #[must_use]
    pub fn stale(&self) -> Option<&str> {
        self.stale.as_deref()
    }

    /// Records passing the current selection, in list order.
    #[must_use]
    pub fn visible(&self) -> Vec<&WalletRecord> {
        self.records.iter().filter(|r| self.selection.matches(r)).collect()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&WalletRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        self.selection.toggle_platform(platform);
    }

    pub fn toggle_chain(&mut self, chain: Chain) {
        self.selection.toggle_chain(chain);
    }

    /// Replace the list with the provider's current rows.
    pub async fn refresh(&mut self) {
        match self.store.list_records().await {
            Ok(records) => {
                tracing::info!(count = records.len(), "wallet list refreshed");
                self.records = records;
                self.stale = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching wallets; keeping previous list");
                self.stale = Some(e.user_message());
            }
        }
    }

    /// Insert remotely, then refresh. Returns whether the insert succeeded.
    pub async fn add(&mut self, record: &NewWallet) -> bool {
        if let Err(e) = self.store.insert_record(record).await {
            tracing::warn!(error = %e, name = %record.name, "insert failed");
            self.notifier.alert(&format!("Error adding wallet: {}", e.user_message()));
            return false;
        }
        self.refresh().await;
        true
    }

    /// Delete remotely; on success drop the local entry without refreshing.
    pub async fn remove(&mut self, id: &str) -> bool {
        if let Err(e) = self.store.delete_record(id).await {
            tracing::warn!(error = %e, %id, "delete failed");
            self.notifier.alert(&format!("Error deleting wallet: {}", e.user_message()));
            return false;
        }
        self.records.retain(|r| r.id != id);
        true
    }

    /// Forget every record (sign-out). The selection is kept.
    pub fn clear(&mut self) {
        self.records.clear();
        self.stale = None;
    }
}

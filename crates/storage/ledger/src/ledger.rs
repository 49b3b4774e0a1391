//! Per-feed record of what has already been published.
//!
//! Only one orchestrator process may own a ledger file. Two instances sharing it
//! would race on the read-modify-write in [`DedupLedger::commit`].

use crate::store::{LedgerSnapshot, LedgerStore};
use crate::LedgerError;
use herald_types_events::EventId;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    pub last_id: EventId,
    /// Exact text of the last message published for the feed. Kept in memory only.
    pub last_message: Option<String>,
}

pub struct DedupLedger<S> {
    store: S,
    entries: BTreeMap<String, LedgerEntry>,
}

impl<S: LedgerStore> DedupLedger<S> {
    /// Load the ledger. An unreadable store is not fatal: every feed starts at 0,
    /// at the price of possibly re-publishing the latest events once.
    pub fn open(store: S) -> Self {
        let entries = match store.load() {
            Ok(snapshot) => {
                info!(feeds = snapshot.len(), "Loaded dedup ledger");
                to_entries(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load dedup ledger, starting from zero");
                BTreeMap::new()
            }
        };

        Self { store, entries }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `None` means nothing was ever published for the feed
    pub fn last_id(&self, feed: &str) -> Option<EventId> {
        self.entries.get(feed).map(|entry| entry.last_id)
    }

    pub fn entry(&self, feed: &str) -> Option<&LedgerEntry> {
        self.entries.get(feed)
    }

    /// Any id different from the last published one is new, including ids lower
    /// than it. A feed that goes backwards gets its events published again.
    pub fn is_new(&self, feed: &str, id: EventId) -> bool {
        id != self.last_id(feed).unwrap_or_default()
    }

    /// Whether `text` is exactly the last message published for the feed
    pub fn is_repeat(&self, feed: &str, text: &str) -> bool {
        self.entries.get(feed).and_then(|entry| entry.last_message.as_deref()) == Some(text)
    }

    /// Record `id` as published for `feed`.
    ///
    /// Must only be called once the publication succeeded. The in-memory state is
    /// advanced even when the write fails so this process does not publish the
    /// event twice; the error is returned so the caller can report it loudly.
    pub fn commit(&mut self, feed: &str, id: EventId, message: Option<&str>) -> Result<(), LedgerError> {
        let entry = self.entries.entry(feed.to_string()).or_default();
        entry.last_id = id;
        if let Some(message) = message {
            entry.last_message = Some(message.to_string());
        }

        let mut snapshot = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(LedgerError::NotFound(_)) => LedgerSnapshot::new(),
            Err(e) => {
                warn!(error = %e, "Ledger unreadable before commit, rewriting from memory");
                self.snapshot()
            }
        };
        snapshot.insert(feed.to_string(), id);

        self.store.save(&snapshot)?;
        info!(%feed, %id, "Committed last published id");
        Ok(())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.entries.iter().map(|(feed, entry)| (feed.clone(), entry.last_id)).collect()
    }
}

fn to_entries(snapshot: LedgerSnapshot) -> BTreeMap<String, LedgerEntry> {
    snapshot.into_iter().map(|(feed, last_id)| (feed, LedgerEntry { last_id, last_message: None })).collect()
}

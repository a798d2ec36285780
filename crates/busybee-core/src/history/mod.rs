//! Recent searches.
//!
//! Holds at most [`HISTORY_CAPACITY`] entries, most recent first, unique by
//! case-insensitive query and kind. Persistence is best effort: failures are
//! logged and the in-memory list stays authoritative for the session.

pub mod storage;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::model::AnalysisKind;
use storage::KeyValueStore;

/// Storage key holding the serialized history.
pub const HISTORY_KEY: &str = "busyBeeSearchHistory";

/// Maximum number of retained entries.
pub const HISTORY_CAPACITY: usize = 10;

/// A previously submitted search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
}

impl SearchHistoryEntry {
    pub fn new(query: impl Into<String>, kind: AnalysisKind) -> Self {
        Self {
            query: query.into(),
            kind,
        }
    }

    /// Same kind and same query, ignoring case.
    pub fn same_search(&self, other: &SearchHistoryEntry) -> bool {
        self.kind == other.kind && self.query.to_lowercase() == other.query.to_lowercase()
    }
}

/// Put `entry` in front of `prior`, dropping any earlier copy of the same
/// search and anything past capacity.
pub fn merge_entry(prior: &[SearchHistoryEntry], entry: SearchHistoryEntry) -> Vec<SearchHistoryEntry> {
    let mut merged = Vec::with_capacity(HISTORY_CAPACITY);
    merged.extend(
        prior
            .iter()
            .filter(|existing| !existing.same_search(&entry))
            .cloned(),
    );
    merged.insert(0, entry);
    merged.truncate(HISTORY_CAPACITY);
    merged
}

/// Search history backed by a [`KeyValueStore`].
pub struct HistoryStore {
    storage: Box<dyn KeyValueStore>,
    entries: Vec<SearchHistoryEntry>,
}

impl HistoryStore {
    /// Create an empty store. Nothing is read until [`HistoryStore::load`].
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            entries: Vec::new(),
        }
    }

    /// Create a store and load whatever is persisted.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    /// Read the persisted history.
    ///
    /// A corrupted value is purged and yields an empty history.
    pub fn load(&mut self) -> &[SearchHistoryEntry] {
        let raw = match self.storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.entries.clear();
                return &self.entries;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read search history");
                self.entries.clear();
                return &self.entries;
            }
        };

        match serde_json::from_str::<Vec<SearchHistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(HISTORY_CAPACITY);
                debug!(count = entries.len(), "Loaded search history");
                self.entries = entries;
            }
            Err(e) => {
                warn!(error = %e, "Search history is corrupted, discarding it");
                if let Err(e) = self.storage.remove(HISTORY_KEY) {
                    warn!(error = %e, "Failed to purge corrupted search history");
                }
                self.entries.clear();
            }
        }

        &self.entries
    }

    /// Record a search and persist the updated list.
    pub fn record(&mut self, entry: SearchHistoryEntry) -> &[SearchHistoryEntry] {
        self.entries = merge_entry(&self.entries, entry);
        self.persist();
        &self.entries
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.entries) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize search history");
                return;
            }
        };

        if let Err(e) = self.storage.set(HISTORY_KEY, &serialized) {
            warn!(error = %e, "Failed to save search history");
        }
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

//! Recent-search history.
//!
//! Most-recent-first, bounded, and unique per Pokémon id. When backed by a
//! file, the list is loaded once on open and written after every change.
//! A missing or unreadable file means an empty history, never an error.

use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, warn};

use crate::storage;
use crate::types::{HistoryEntry, Pokemon};

/// Default number of remembered searches.
pub const MAX_HISTORY_ITEMS: usize = 5;

#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
    max_items: usize,
    path: Option<PathBuf>,
}

/// A snapshot of the history waiting to be written to its file.
#[derive(Debug)]
pub struct PendingWrite {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl PendingWrite {
    /// Write the snapshot. Failures are logged; memory stays authoritative.
    pub fn run(self) {
        if let Err(e) = storage::save_history(&self.entries, &self.path) {
            error!(path = %self.path.display(), error = %e, "Failed to save search history");
        }
    }
}

impl SearchHistory {
    /// A history that lives only in memory.
    pub fn in_memory(max_items: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_items,
            path: None,
        }
    }

    /// Open a file-backed history.
    pub fn open(path: impl Into<PathBuf>, max_items: usize) -> Self {
        let path = path.into();
        let mut entries = match storage::load_history(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable search history");
                Vec::new()
            }
        };
        entries.truncate(max_items);

        Self {
            entries,
            max_items,
            path: Some(path),
        }
    }

    /// Remember a search and save the file right away.
    pub fn record(&mut self, pokemon: Pokemon, client_id: &str) -> &HistoryEntry {
        self.remember(pokemon, client_id);
        self.persist();
        &self.entries[0]
    }

    /// Remember a search in memory only. An earlier entry for the same
    /// Pokémon is dropped first, the new entry goes to the front, and the
    /// list is trimmed. Pair with [`SearchHistory::pending_write`].
    pub fn remember(&mut self, pokemon: Pokemon, client_id: &str) -> &HistoryEntry {
        self.entries.retain(|e| e.pokemon.id != pokemon.id);
        self.entries.insert(
            0,
            HistoryEntry {
                pokemon,
                timestamp: Utc::now(),
                client_id: client_id.to_string(),
            },
        );
        self.entries.truncate(self.max_items);
        &self.entries[0]
    }

    /// Snapshot for a deferred write; `None` for in-memory histories.
    pub fn pending_write(&self) -> Option<PendingWrite> {
        self.path.as_ref().map(|path| PendingWrite {
            path: path.clone(),
            entries: self.entries.clone(),
        })
    }

    /// All entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries recorded by one client, most recent first.
    pub fn for_client(&self, client_id: &str) -> Vec<&HistoryEntry> {
        self.entries.iter().filter(|e| e.client_id == client_id).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Some(job) = self.pending_write() {
            job.run();
        }
    }
}

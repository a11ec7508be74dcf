//! Persistence layer.
//!
//! The search history is one JSON document, rewritten whole on every
//! change. Readers get `Ok(None)` for a file that is not there yet.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::HistoryEntry;

/// Default history file path.
pub const DEFAULT_HISTORY_FILE: &str = "pokedex_history.json";

/// Write the history list to `path`, replacing any previous content.
pub fn save_history(entries: &[HistoryEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(entries).context("Failed to serialise search history")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write history to {}", path.display()))?;

    debug!(path = %path.display(), entries = entries.len(), "History saved");
    Ok(())
}

/// Read the history list from `path`.
pub fn load_history(path: &Path) -> Result<Option<Vec<HistoryEntry>>> {
    let json = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No saved history, starting empty");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read history from {}", path.display()))
        }
    };

    let entries: Vec<HistoryEntry> = serde_json::from_slice(&json)
        .with_context(|| format!("Failed to parse history from {}", path.display()))?;

    info!(path = %path.display(), entries = entries.len(), "History loaded");
    Ok(Some(entries))
}

/// Remove the history file. A missing file is not an error.
pub fn delete_history(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
    }
}

#[cfg(test)]
pub(crate) fn temp_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pokedex_test_history_{}.json", uuid::Uuid::new_v4()))
}

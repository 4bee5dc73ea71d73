//! Snapshot export/import for the token store
//!
//! A snapshot is a JSON object keyed by token; each value carries the target
//! URL and the absolute expiration timestamp (`null` = never expires). Export
//! and import are exact round-trip inverses for token, target and expiry.

use std::collections::HashMap;
use std::fs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{Entry, StoreConfig, TokenStore};
use crate::errors::{Result, ShortyError};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SnapshotEntry {
    pub target: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Entry> for SnapshotEntry {
    fn from(entry: Entry) -> Self {
        SnapshotEntry {
            target: entry.target,
            expires_at: entry.expires_at,
        }
    }
}

impl From<SnapshotEntry> for Entry {
    fn from(entry: SnapshotEntry) -> Self {
        Entry {
            target: entry.target,
            expires_at: entry.expires_at,
        }
    }
}

/// Serialize every tracked entry to a JSON snapshot string.
pub fn dump_json(store: &TokenStore) -> Result<String> {
    let entries: HashMap<String, SnapshotEntry> = store
        .export_all()
        .into_iter()
        .map(|(token, entry)| (token, entry.into()))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Write a snapshot of the store to `path`, returning the entry count.
/// A failed write leaves the store untouched.
pub fn export_to_file(store: &TokenStore, path: &str) -> Result<usize> {
    let entries = store.export_all();
    let count = entries.len();

    let snapshot: HashMap<String, SnapshotEntry> = entries
        .into_iter()
        .map(|(token, entry)| (token, entry.into()))
        .collect();
    let json = serde_json::to_string_pretty(&snapshot)?;

    fs::write(path, json).map_err(|e| {
        error!("Failed to write snapshot to {}: {}", path, e);
        ShortyError::file_operation(format!("Failed to write snapshot to {}: {}", path, e))
    })?;

    info!("Exported {} entries to {}", count, path);
    Ok(count)
}

/// Replace the store with the snapshot parsed from `bytes`, returning the
/// imported entry count. The payload is parsed in full before the swap, so a
/// malformed snapshot fails closed with the prior store intact.
pub fn import_from_slice(store: &TokenStore, bytes: &[u8], config: StoreConfig) -> Result<usize> {
    let snapshot: HashMap<String, SnapshotEntry> =
        serde_json::from_slice(bytes).map_err(|e| {
            error!("Failed to parse snapshot payload: {}", e);
            ShortyError::serialization(format!("Failed to parse snapshot payload: {}", e))
        })?;

    let count = snapshot.len();
    let entries: HashMap<String, Entry> = snapshot
        .into_iter()
        .map(|(token, entry)| (token, entry.into()))
        .collect();

    store.replace_all(entries, config);
    info!("Imported {} entries into the store", count);
    Ok(count)
}

/// Replace the store with the snapshot read from `path`.
pub fn import_from_file(store: &TokenStore, path: &str, config: StoreConfig) -> Result<usize> {
    let bytes = fs::read(path).map_err(|e| {
        error!("Failed to read snapshot file {}: {}", path, e);
        ShortyError::file_operation(format!("Failed to read snapshot file {}: {}", path, e))
    })?;
    import_from_slice(store, &bytes, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_snapshot_round_trip_preserves_expiry() {
        let store = TokenStore::new(StoreConfig::default());
        store.set("abc123", "https://example.com", Some(Duration::hours(5)));
        store.set("forever", "https://example.org", None);
        let before = store.export_all();

        let json = dump_json(&store).unwrap();
        let restored = TokenStore::new(StoreConfig::default());
        let imported =
            import_from_slice(&restored, json.as_bytes(), StoreConfig::default()).unwrap();

        assert_eq!(imported, 2);
        assert_eq!(restored.export_all(), before);
    }

    #[test]
    fn test_malformed_payload_fails_closed() {
        let store = TokenStore::new(StoreConfig::default());
        store.set("keep", "https://example.com", None);

        let result = import_from_slice(&store, b"{ not json", StoreConfig::default());
        assert!(matches!(result, Err(ShortyError::Serialization(_))));
        // prior store intact
        assert_eq!(store.get("keep"), Some("https://example.com".to_string()));
    }
}

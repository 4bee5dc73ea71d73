//! In-memory token store with TTL semantics
//!
//! Maps short tokens to target URLs. Expiration is lazy: an expired entry is
//! invisible to readers immediately, and a periodic background sweep reclaims
//! the memory later.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use parking_lot::Mutex;
use tracing::{debug, info};

pub mod snapshot;

/// A stored (target, expiration) pair. The token is the map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub target: String,
    /// `None` means the entry never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// TTL and sweep parameters for one store generation.
///
/// A full import installs a new generation together with new parameters, so
/// sweeps after an import run with the interval the import supplied.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Applied to new entries when the caller does not pass an explicit TTL;
    /// `None` means entries never expire
    pub default_ttl: Option<Duration>,
    pub cleanup_interval: StdDuration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_ttl: Some(Duration::hours(240)),
            cleanup_interval: StdDuration::from_secs(3600),
        }
    }
}

struct Generation {
    entries: DashMap<String, Entry>,
    config: StoreConfig,
}

/// Concurrency-safe token → target mapping.
///
/// Constructed once at startup and passed by handle; single-key operations
/// need no caller-side locking. [`TokenStore::replace_all`] swaps the whole
/// store atomically, so readers never observe a mix of old and new entries.
pub struct TokenStore {
    current: Arc<ArcSwap<Generation>>,
    sweeper: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl TokenStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(Generation {
                entries: DashMap::new(),
                config,
            })),
            sweeper: Mutex::new(None),
        }
    }

    /// Look up a live entry. Expired entries are absent even if the sweep
    /// has not reclaimed them yet.
    pub fn get(&self, token: &str) -> Option<String> {
        self.get_entry(token).map(|entry| entry.target)
    }

    pub fn get_entry(&self, token: &str) -> Option<Entry> {
        let generation = self.current.load();
        let entry = generation.entries.get(token)?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.value().clone())
    }

    /// Insert or overwrite an entry. `ttl = None` marks it never-expiring.
    pub fn set(&self, token: &str, target: &str, ttl: Option<Duration>) {
        let generation = self.current.load();
        generation.entries.insert(
            token.to_string(),
            Entry {
                target: target.to_string(),
                expires_at: Self::expires_from(ttl),
            },
        );
    }

    /// Insert only if no live entry holds `token`; returns whether the entry
    /// was written. An expired occupant counts as absent and is replaced.
    pub fn insert_if_absent(&self, token: &str, target: &str, ttl: Option<Duration>) -> bool {
        let now = Utc::now();
        let entry = Entry {
            target: target.to_string(),
            expires_at: Self::expires_from(ttl),
        };
        let generation = self.current.load();
        match generation.entries.entry(token.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired_at(now) {
                    occupied.insert(entry);
                    true
                } else {
                    false
                }
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(entry);
                true
            }
        }
    }

    /// Number of tracked entries, including expired ones the sweep has not
    /// reclaimed yet. An upper bound on live entries.
    pub fn count(&self) -> usize {
        self.current.load().entries.len()
    }

    /// Serialize every tracked entry (live or not-yet-swept) with its
    /// expiration metadata.
    pub fn export_all(&self) -> HashMap<String, Entry> {
        self.current
            .load()
            .entries
            .iter()
            .map(|kv| (kv.key().clone(), kv.value().clone()))
            .collect()
    }

    /// Discard the current store and install a new one seeded from
    /// `entries`, applied as a single atomic pointer swap. Pre-existing
    /// tokens not present in `entries` become unreachable.
    pub fn replace_all(&self, entries: HashMap<String, Entry>, config: StoreConfig) {
        let map = DashMap::with_capacity(entries.len());
        for (token, entry) in entries {
            map.insert(token, entry);
        }
        self.current.store(Arc::new(Generation {
            entries: map,
            config,
        }));
    }

    /// Drop every tracked entry.
    pub fn flush(&self) {
        self.current.load().entries.clear();
    }

    /// Remove every expired entry, returning how many were reclaimed.
    pub fn sweep_now(&self) -> usize {
        sweep(&self.current.load())
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.current.load().config.default_ttl
    }

    pub fn cleanup_interval(&self) -> StdDuration {
        self.current.load().config.cleanup_interval
    }

    /// Spawn the periodic sweep task. Re-reads the interval every tick so a
    /// [`TokenStore::replace_all`] with new parameters takes effect without a
    /// restart. No-op if the sweeper is already running.
    pub fn spawn_sweeper(&self) {
        let mut sweeper = self.sweeper.lock();
        if sweeper.is_some() {
            return;
        }

        // the task holds only the generation handle, so dropping the store
        // itself is never blocked on the sweeper
        let current = Arc::clone(&self.current);
        let handle = tokio::spawn(async move {
            loop {
                let interval = current.load().config.cleanup_interval;
                tokio::time::sleep(interval).await;
                let removed = sweep(&current.load());
                if removed > 0 {
                    debug!("Sweep reclaimed {} expired entries", removed);
                }
            }
        });
        *sweeper = Some(handle);
        info!(
            "Expiration sweeper started, interval {:?}",
            self.cleanup_interval()
        );
    }

    /// Stop the sweep task. Safe to call when no sweeper is running.
    pub fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
            debug!("Expiration sweeper stopped");
        }
    }

    fn expires_from(ttl: Option<Duration>) -> Option<DateTime<Utc>> {
        ttl.map(|d| Utc::now() + d)
    }
}

fn sweep(generation: &Generation) -> usize {
    let now = Utc::now();
    let before = generation.entries.len();
    generation.entries.retain(|_, entry| !entry.is_expired_at(now));
    before.saturating_sub(generation.entries.len())
}

impl Drop for TokenStore {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
    }
}

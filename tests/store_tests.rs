use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use shorty::store::{Entry, StoreConfig, TokenStore};

fn test_config() -> StoreConfig {
    StoreConfig {
        default_ttl: Some(Duration::hours(240)),
        cleanup_interval: StdDuration::from_secs(3600),
    }
}

#[cfg(test)]
mod ttl_semantics_tests {
    use super::*;

    #[test]
    fn test_never_expiring_entry_survives_sweep() {
        let store = TokenStore::new(test_config());
        store.set("keep", "https://example.com", None);

        assert_eq!(store.sweep_now(), 0);
        assert_eq!(store.get("keep"), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_expired_entry_invisible_before_sweep() {
        let store = TokenStore::new(test_config());
        store.set("gone", "https://example.com", Some(Duration::zero()));

        // lazy expiration: absent to readers, still tracked
        assert_eq!(store.get("gone"), None);
        assert_eq!(store.count(), 1);

        assert_eq!(store.sweep_now(), 1);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_future_expiry_is_live() {
        let store = TokenStore::new(test_config());
        store.set("soon", "https://example.com", Some(Duration::hours(1)));

        assert_eq!(store.get("soon"), Some("https://example.com".to_string()));
        assert_eq!(store.sweep_now(), 0);
    }

    #[test]
    fn test_count_is_upper_bound_on_live_entries() {
        let store = TokenStore::new(test_config());
        store.set("live", "https://example.com", None);
        store.set("dead", "https://example.com", Some(Duration::zero()));

        assert_eq!(store.count(), 2);
        assert!(store.get("dead").is_none());
    }
}

#[cfg(test)]
mod replace_all_tests {
    use super::*;

    #[test]
    fn test_replace_is_not_a_merge() {
        let store = TokenStore::new(test_config());
        store.set("before", "https://old.example", None);

        let mut entries = HashMap::new();
        entries.insert(
            "after".to_string(),
            Entry {
                target: "https://new.example".to_string(),
                expires_at: None,
            },
        );
        store.replace_all(entries, test_config());

        assert_eq!(store.get("before"), None);
        assert_eq!(store.get("after"), Some("https://new.example".to_string()));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_replace_installs_new_sweep_parameters() {
        let store = TokenStore::new(test_config());
        store.replace_all(
            HashMap::new(),
            StoreConfig {
                default_ttl: None,
                cleanup_interval: StdDuration::from_secs(5),
            },
        );

        assert_eq!(store.default_ttl(), None);
        assert_eq!(store.cleanup_interval(), StdDuration::from_secs(5));
    }

    #[test]
    fn test_export_then_replace_reproduces_store() {
        let store = TokenStore::new(test_config());
        store.set("one", "https://one.example", Some(Duration::hours(3)));
        store.set("two", "https://two.example", None);

        let exported = store.export_all();
        let restored = TokenStore::new(test_config());
        restored.replace_all(exported.clone(), test_config());

        assert_eq!(restored.export_all(), exported);
        assert_eq!(restored.get("one"), Some("https://one.example".to_string()));
        assert_eq!(restored.get("two"), Some("https://two.example".to_string()));
    }
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_inserts_on_distinct_tokens() {
        let store = Arc::new(TokenStore::new(test_config()));

        let mut handles = Vec::new();
        for task in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    let token = format!("t{}x{}", task, i);
                    store.set(&token, "https://example.com", None);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count(), 1600);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_conditional_insert_has_single_winner() {
        let store = Arc::new(TokenStore::new(test_config()));

        let mut handles = Vec::new();
        for task in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let target = format!("https://example.com/{}", task);
                store.insert_if_absent("contested", &target, None)
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert!(store.get("contested").is_some());
    }
}

#[cfg(test)]
mod sweeper_task_tests {
    use super::*;

    #[tokio::test]
    async fn test_background_sweep_reclaims_expired_entries() {
        let store = Arc::new(TokenStore::new(StoreConfig {
            default_ttl: Some(Duration::hours(1)),
            cleanup_interval: StdDuration::from_millis(50),
        }));
        store.set("dead", "https://example.com", Some(Duration::zero()));
        store.set("live", "https://example.com", None);

        store.spawn_sweeper();
        tokio::time::sleep(StdDuration::from_millis(300)).await;
        store.shutdown();

        assert_eq!(store.count(), 1);
        assert_eq!(store.get("live"), Some("https://example.com".to_string()));
    }

    #[tokio::test]
    async fn test_shutdown_without_sweeper_is_noop() {
        let store = TokenStore::new(test_config());
        store.shutdown();
    }
}

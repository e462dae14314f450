use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at: Instant,
    ttl: Duration,
}

/// In-memory key/value store with per-entry expiry. Entries are valid while
/// `stored_at.elapsed() < ttl`; expired entries stay in the map until they
/// are overwritten or the cache is cleared (the keyspace is small and
/// bounded by distinct endpoint/parameter combinations).
#[derive(Debug, Clone)]
pub struct Cache<T> {
    data: Arc<Mutex<HashMap<String, Entry<T>>>>,
    default_ttl: Duration,
}

impl<T: Clone> Cache<T> {
    pub fn new(default_ttl_secs: u64) -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        let data = self.data.lock().await;
        if let Some(entry) = data.get(key) {
            if entry.stored_at.elapsed() < entry.ttl {
                return Some(entry.value.clone());
            }
        }
        None
    }

    pub async fn set(&self, key: String, value: T) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Overwrites unconditionally; last write wins.
    pub async fn set_with_ttl(&self, key: String, value: T, ttl: Duration) {
        let mut data = self.data.lock().await;
        data.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    pub async fn delete(&self, key: &str) {
        let mut data = self.data.lock().await;
        data.remove(key);
    }

    pub async fn clear(&self) {
        let mut data = self.data.lock().await;
        data.clear();
    }
}

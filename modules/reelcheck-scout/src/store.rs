use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::fact_check::FactCheckRecord;

/// Append-only per-user log of completed checks.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: FactCheckRecord) -> Result<()>;
    /// The user's records, oldest first.
    async fn history(&self, user_id: &str) -> Result<Vec<FactCheckRecord>>;
}

/// Scraped article text keyed by URL. Misses and write failures are not errors.
#[async_trait]
pub trait ContentCache: Send + Sync {
    async fn get(&self, url: &str) -> Option<String>;
    async fn set(&self, url: &str, content: String);
}

// --- In-memory implementations ---

#[derive(Default)]
pub struct InMemoryHistory {
    records: Mutex<HashMap<String, Vec<FactCheckRecord>>>,
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, record: FactCheckRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("history lock poisoned"))?;
        records.entry(record.user_id.clone()).or_default().push(record);
        Ok(())
    }

    async fn history(&self, user_id: &str) -> Result<Vec<FactCheckRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow!("history lock poisoned"))?;
        Ok(records.get(user_id).cloned().unwrap_or_default())
    }
}

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Bounded cache that evicts the oldest insertion first.
pub struct InMemoryContentCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl InMemoryContentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryContentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[async_trait]
impl ContentCache for InMemoryContentCache {
    async fn get(&self, url: &str) -> Option<String> {
        self.inner.lock().ok()?.entries.get(url).cloned()
    }

    async fn set(&self, url: &str, content: String) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        if inner.entries.insert(url.to_string(), content).is_none() {
            inner.order.push_back(url.to_string());
        }
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reelcheck_verdict::aggregate;
    use uuid::Uuid;

    fn record(user: &str, claim: &str) -> FactCheckRecord {
        FactCheckRecord {
            id: Uuid::new_v4(),
            user_id: user.into(),
            claim: claim.into(),
            result: aggregate(&[]),
            checked_at: Utc::now(),
            partial: false,
        }
    }

    #[tokio::test]
    async fn history_is_per_user_and_in_append_order() {
        let store = InMemoryHistory::default();
        store.append(record("alice", "one")).await.unwrap();
        store.append(record("bob", "two")).await.unwrap();
        store.append(record("alice", "three")).await.unwrap();

        let claims: Vec<_> = store
            .history("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.claim)
            .collect();
        assert_eq!(claims, vec!["one", "three"]);
        assert!(store.history("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cache_round_trip_and_eviction() {
        let cache = InMemoryContentCache::new(2);
        cache.set("a", "A".into()).await;
        cache.set("b", "B".into()).await;
        assert_eq!(cache.get("a").await.as_deref(), Some("A"));

        cache.set("c", "C".into()).await;
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("c").await.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn overwriting_a_key_does_not_grow_the_cache() {
        let cache = InMemoryContentCache::new(2);
        cache.set("a", "1".into()).await;
        cache.set("a", "2".into()).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").await.as_deref(), Some("2"));
    }
}

//! Time-boxed in-memory cache for rollup payloads.
//!
//! Entries are valid while `now - cached_at < ttl`; stale entries are not
//! evicted, they are silently overwritten by the next fresh rollup.
//! Concurrent rollups for the same key may both miss and both recompute;
//! last write wins, which is acceptable because recomputation is idempotent.

use crate::domain::insights::TeamCoachingInsights;
use crate::domain::ports::InsightsCache;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, error};

struct CacheEntry {
    insights: TeamCoachingInsights,
    cached_at: DateTime<Utc>,
}

pub struct InMemoryInsightsCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl std::fmt::Debug for InMemoryInsightsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryInsightsCache")
            .field("ttl", &self.ttl)
            .field("entries", &"<RwLock>")
            .finish()
    }
}

impl InMemoryInsightsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Shift an entry's timestamp into the past, so TTL expiry is testable
    /// without real time passing
    pub fn backdate(&self, key: &str, by: Duration) {
        let mut guard = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(entry) = guard.get_mut(key) {
            entry.cached_at -= by;
        }
    }
}

#[async_trait]
impl InsightsCache for InMemoryInsightsCache {
    async fn get(&self, key: &str) -> Option<TeamCoachingInsights> {
        let guard = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = guard.get(key)?;
        let age = Utc::now() - entry.cached_at;
        if age < self.ttl {
            debug!(key, age_secs = age.num_seconds(), "insights cache hit");
            Some(entry.insights.clone())
        } else {
            debug!(key, age_secs = age.num_seconds(), "insights cache entry stale");
            None
        }
    }

    async fn put(&self, key: &str, insights: TeamCoachingInsights) {
        let entry = CacheEntry {
            insights,
            cached_at: Utc::now(),
        };
        match self.entries.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), entry);
            }
            Err(poisoned) => {
                error!("insights cache lock poisoned during write, recovering");
                poisoned.into_inner().insert(key.to_string(), entry);
            }
        }
    }

    async fn clear(&self) {
        match self.entries.write() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

//! Read-through event-catalog cache.
//!
//! Event configuration is read-mostly and tolerates staleness, unlike
//! registration state which is never cached. Entries expire after a bounded
//! TTL; when a refresh fails and a stale entry exists, the stale value is
//! served and the failure logged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::warn;

use crate::models::EventConfig;
use crate::services::store::{EventSource, StoreError};

struct CachedEvent {
    /// `None` caches a miss so unknown ids do not hammer the store.
    value: Option<EventConfig>,
    fetched_at: Instant,
}

/// Process-wide read-through cache over an injectable [`EventSource`].
pub struct EventCache {
    source: Arc<dyn EventSource>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedEvent>>,
}

impl EventCache {
    pub fn new(source: Arc<dyn EventSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the event configuration, fetching through the source when the
    /// cached entry is missing or older than the TTL.
    pub async fn get(&self, event_id: &str) -> Result<Option<EventConfig>, StoreError> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(event_id) {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.value.clone());
                }
            }
        }

        match self.source.fetch_event(event_id).await {
            Ok(value) => {
                let mut entries = self.entries.write().await;
                entries.insert(
                    event_id.to_string(),
                    CachedEvent {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Ok(value)
            }
            Err(err) => {
                // Stale-on-error: an expired entry beats an outage.
                let entries = self.entries.read().await;
                if let Some(entry) = entries.get(event_id) {
                    warn!(
                        event_id = %event_id,
                        error = %err,
                        "Event source failed, serving stale cache entry"
                    );
                    return Ok(entry.value.clone());
                }
                Err(err)
            }
        }
    }

    /// Drops all cached entries. Used by admin tooling after catalog edits.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

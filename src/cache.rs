use crate::domain::{Clock, SystemClock};
use crate::models::MediaItem;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct CacheEntry {
    items: Arc<Vec<MediaItem>>,
    created_at: Instant,
}

/// Single-slot TTL cache holding the last processed media list.
pub struct MediaCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: RwLock<Option<CacheEntry>>,
}

impl MediaCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached list if it is still inside the TTL window.
    /// An expired entry is evicted.
    pub async fn get(&self) -> Option<Arc<Vec<MediaItem>>> {
        let now = self.clock.now();
        {
            let slot = self.slot.read().await;
            match slot.as_ref() {
                None => return None,
                Some(entry) if now.duration_since(entry.created_at) < self.ttl => {
                    return Some(Arc::clone(&entry.items));
                }
                Some(_) => {}
            }
        }

        let mut slot = self.slot.write().await;
        // Another task may have repopulated the slot in between.
        if let Some(entry) = slot.as_ref() {
            if now.duration_since(entry.created_at) < self.ttl {
                return Some(Arc::clone(&entry.items));
            }
            tracing::debug!(age_secs = now.duration_since(entry.created_at).as_secs(), "Media cache entry expired");
        }
        *slot = None;
        None
    }

    /// Stores a freshly processed list, replacing whatever was there.
    pub async fn put(&self, items: Vec<MediaItem>) -> Arc<Vec<MediaItem>> {
        let items = Arc::new(items);
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            items: Arc::clone(&items),
            created_at: self.clock.now(),
        });
        items
    }

    pub async fn clear(&self) {
        self.slot.write().await.take();
    }
}

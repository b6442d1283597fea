use crate::domain::entities::CacheEnvelope;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Single-slot in-memory envelope holding the last successful network read.
pub struct EnvelopeCache<T: Clone> {
    slot: Arc<RwLock<Option<CacheEnvelope<T>>>>,
    ttl: Duration,
}

impl<T> EnvelopeCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl = Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX / 1000));
        Self {
            slot: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    pub async fn store(&self, data: T, now: DateTime<Utc>) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEnvelope::new(data, now, self.ttl));
    }

    /// Data from a live envelope; expired envelopes read as empty.
    pub async fn read(&self, now: DateTime<Utc>) -> Option<T> {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(envelope) if !envelope.is_expired(now) => Some(envelope.data.clone()),
            _ => None,
        }
    }

    /// Drops the envelope if it outlived its ttl. Returns whether one was removed.
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> bool {
        let mut slot = self.slot.write().await;
        let expired = slot
            .as_ref()
            .map(|envelope| envelope.is_expired(now))
            .unwrap_or(false);
        if expired {
            *slot = None;
        }
        expired
    }

    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        *slot = None;
    }

    pub async fn is_empty(&self) -> bool {
        self.slot.read().await.is_none()
    }
}

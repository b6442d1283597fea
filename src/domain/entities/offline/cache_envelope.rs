use chrono::{DateTime, Duration, Utc};

/// Last-resort read fallback held in memory by the cache service.
#[derive(Debug, Clone)]
pub struct CacheEnvelope<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub ttl: Duration,
}

impl<T> CacheEnvelope<T> {
    pub fn new(data: T, timestamp: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp > self.ttl
    }
}

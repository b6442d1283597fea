use async_trait::async_trait;
use inventory_offline::{AppError, Synchronizer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Counts drain calls; optionally fails every drain.
#[derive(Clone, Default)]
pub struct RecordingSynchronizer {
    drains: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl RecordingSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let synchronizer = Self::default();
        synchronizer.failing.store(true, Ordering::SeqCst);
        synchronizer
    }

    pub fn drain_count(&self) -> usize {
        self.drains.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synchronizer for RecordingSynchronizer {
    async fn drain(&self) -> Result<(), AppError> {
        self.drains.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Network("backend unavailable".into()));
        }
        Ok(())
    }
}

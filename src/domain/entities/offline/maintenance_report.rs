use serde::{Deserialize, Serialize};

/// Outcome of one maintenance pass. Failed steps are listed in `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceReport {
    pub envelopes_evicted: u32,
    pub actions_removed: u64,
    pub tombstones_purged: u64,
    pub compacted: bool,
    pub errors: Vec<String>,
}

impl MaintenanceReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

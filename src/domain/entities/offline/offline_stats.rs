use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OfflineStats {
    pub material_count: i64,
    pub order_count: i64,
    pub pending_action_count: i64,
    pub last_sync_at: Option<DateTime<Utc>>,
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a row in the scalar sync-status table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncStatusKey {
    LastSyncAt,
    ConnectivitySnapshot,
    Custom(String),
}

impl SyncStatusKey {
    pub fn as_str(&self) -> &str {
        match self {
            SyncStatusKey::LastSyncAt => "last_sync_at",
            SyncStatusKey::ConnectivitySnapshot => "connectivity_snapshot",
            SyncStatusKey::Custom(value) => value.as_str(),
        }
    }
}

impl fmt::Display for SyncStatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for SyncStatusKey {
    fn from(value: &str) -> Self {
        match value {
            "last_sync_at" => SyncStatusKey::LastSyncAt,
            "connectivity_snapshot" => SyncStatusKey::ConnectivitySnapshot,
            other => SyncStatusKey::Custom(other.to_string()),
        }
    }
}

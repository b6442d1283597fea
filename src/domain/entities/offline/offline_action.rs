use crate::domain::value_objects::{
    EntityId, EntityType, OfflineActionId, OfflineActionType, OfflinePayload,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally-originated mutation waiting to be replayed against the backend.
///
/// Only `synced`, `retry_count` and `last_error` change after the action is
/// appended; everything else is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfflineActionRecord {
    pub id: OfflineActionId,
    pub action_type: OfflineActionType,
    pub entity: EntityType,
    pub entity_id: EntityId,
    pub payload: OfflinePayload,
    pub timestamp: DateTime<Utc>,
    pub synced: bool,
    pub retry_count: u32,
    pub last_error: Option<String>,
}

impl OfflineActionRecord {
    pub fn new(
        action_type: OfflineActionType,
        entity: EntityType,
        entity_id: EntityId,
        payload: OfflinePayload,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OfflineActionId::generate(),
            action_type,
            entity,
            entity_id,
            payload,
            timestamp,
            synced: false,
            retry_count: 0,
            last_error: None,
        }
    }

    pub fn with_synced(mut self, synced: bool) -> Self {
        self.synced = synced;
        self
    }

    pub fn is_pending(&self) -> bool {
        !self.synced
    }
}

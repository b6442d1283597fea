use crate::shared::error::AppError;
use async_trait::async_trait;

/// Replays the unsynced action queue against the backend.
///
/// Implementations consume `list_unsynced_actions` in ascending timestamp
/// order and call exactly one of `mark_action_synced` / `update_action_error`
/// per attempted action.
#[async_trait]
pub trait Synchronizer: Send + Sync {
    async fn drain(&self) -> Result<(), AppError>;
}

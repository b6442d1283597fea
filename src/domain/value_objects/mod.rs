pub mod connectivity;
pub mod offline;

pub use connectivity::ConnectivityState;
pub use offline::{
    EntityId, EntityType, OfflineActionId, OfflineActionType, OfflinePayload, SyncStatusKey,
};

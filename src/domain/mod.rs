pub mod entities;
pub mod value_objects;

pub use entities::{MaterialRecord, OfflineActionRecord, OrderRecord};
pub use value_objects::{ConnectivityState, EntityType, OfflineActionType};

pub mod connectivity;
pub mod material;
pub mod offline;
pub mod order;

pub use connectivity::{ConnectivitySnapshot, NetworkObservation};
pub use material::{MaterialDraft, MaterialPatch, MaterialRecord};
pub use offline::{CacheEnvelope, MaintenanceReport, OfflineActionRecord, OfflineStats};
pub use order::{
    OrderDraft, OrderLineItem, OrderLineItemDraft, OrderPatch, OrderRecord, OrderStatus,
};

pub mod connectivity;
pub mod local_store;
pub mod remote_api;
pub mod synchronizer;

pub use connectivity::{ConnectionStatus, PlatformConnectivity, ReachabilityProbe};
pub use local_store::LocalStore;
pub use remote_api::{RemoteError, RemoteInventoryApi};
pub use synchronizer::Synchronizer;

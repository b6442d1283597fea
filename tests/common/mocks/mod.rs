pub mod mock_connectivity;
pub mod mock_remote;
pub mod mock_synchronizer;

pub use mock_connectivity::*;
pub use mock_remote::*;
pub use mock_synchronizer::*;

pub mod clock;
pub mod config;
pub mod error;

pub use clock::MonotonicClock;
pub use config::AppConfig;
pub use error::{AppError, Result};

pub mod config;
pub mod error;
pub mod readiness;
pub mod retry;

pub mod kafka;

pub use config::Config;
pub use error::{Error, Result};
pub use readiness::ReadinessCoordinator;

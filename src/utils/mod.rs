//! Utility modules
//!
//! Provides logging setup and single instance enforcement for the daemon.

pub mod logging;
pub mod single_instance;

pub use logging::{LogTarget, init_logging};
pub use single_instance::SingleInstanceGuard;

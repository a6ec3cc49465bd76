//! System-level modules
//!
//! - Logging initialization
//! - Lifecycle management (startup, shutdown)
//! - HTTP server mode

pub mod logging;
pub mod server;
pub mod shutdown;
pub mod startup;

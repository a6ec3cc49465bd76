//! Service layer
//!
//! Business logic shared by the HTTP handlers and the CLI: the link engine
//! and the health probe.

mod engine;
mod health;

pub use engine::*;
pub use health::*;

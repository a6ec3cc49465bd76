//! HTTP transport
//!
//! Thin actix-web layer over [`crate::services::LinkEngine`]: request
//! parsing, client metadata extraction and error-to-JSON mapping.

pub mod client;
pub mod handlers;
pub mod helpers;
pub mod routes;
pub mod types;

pub use routes::configure_routes;

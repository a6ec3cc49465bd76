//! Quicklink - URL shortener core
//!
//! # Architecture
//! - `utils`: alias/URL validation and code generation
//! - `storage`: durable link store and access log (SeaORM)
//! - `cache`: cache-aside layer (Redis, moka or none)
//! - `services`: link engine and health checks
//! - `api`: HTTP transport (actix-web)
//! - `config`: static configuration
//! - `system`: logging and process lifecycle

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

//! Server mode
//!
//! Builds the actix-web app around the startup context and runs it until
//! SIGINT/SIGTERM.

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api::configure_routes;
use crate::config::StaticConfig;

use super::{shutdown, startup};

pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let ctx = startup::prepare_startup(config).await.map_err(|e| {
        error!("Server startup failed: {:#}", e);
        e
    })?;

    let engine = ctx.engine.clone();
    let health = ctx.health.clone();

    let workers = match config.server.workers {
        0 => num_cpus::get(),
        n => n,
    }
    .min(32);
    warn!("Using {} workers for the server", workers);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(engine.clone()))
            .app_data(web::Data::new(health.clone()))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let result = server.run().await;

    shutdown::shutdown(&ctx).await;
    result.context("HTTP server terminated with an error")
}

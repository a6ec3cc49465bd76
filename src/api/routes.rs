use actix_web::{error, web};

use crate::errors::QuicklinkError;

use super::handlers::{analytics, delete_url, health, list_urls, redirect, shorten, update_url};
use super::helpers::error_response;

/// Register every route. The catch-all redirect goes last.
///
/// 路由：
/// - POST /shorten
/// - GET /health
/// - GET /analytics/{code}
/// - GET /urls
/// - PUT/DELETE /urls/{id}
/// - GET /{code}
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/shorten", web::post().to(shorten))
        .route("/health", web::get().to(health))
        .route("/analytics/{code}", web::get().to(analytics))
        .route("/urls", web::get().to(list_urls))
        .route("/urls/{id}", web::put().to(update_url))
        .route("/urls/{id}", web::delete().to(delete_url))
        .route("/{code}", web::get().to(redirect));
}

/// A missing or unparsable shorten body is reported as a missing URL.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let response = error_response(&QuicklinkError::missing_url("URL is required"));
            error::InternalError::from_response(err, response).into()
        })
}

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use crate::services::{HealthService, LinkEngine, ShortenRequest};

use super::client::{client_address, client_agent};
use super::helpers::{api_result, error_response, json_response};
use super::types::{AnalyticsResponse, MessageBody, OwnerQuery, ShortenBody, UpdateBody, UrlsResponse};

pub async fn shorten(
    engine: web::Data<Arc<LinkEngine>>,
    body: web::Json<ShortenBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let req = ShortenRequest {
        url: body.url.unwrap_or_default(),
        owner_id: body.user_id,
        custom_alias: body.custom_alias,
        frontend_base_url: body.frontend_base_url,
    };

    api_result(engine.shorten(req).await)
}

pub async fn redirect(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<Arc<LinkEngine>>,
) -> HttpResponse {
    let code = path.into_inner();
    trace!("Redirect request for '{}'", code);

    match engine
        .resolve(&code, client_agent(&req), client_address(&req))
        .await
    {
        Ok(url) => HttpResponse::Found()
            .insert_header((LOCATION, url))
            .finish(),
        Err(e) => error_response(&e),
    }
}

pub async fn analytics(
    path: web::Path<String>,
    query: web::Query<OwnerQuery>,
    engine: web::Data<Arc<LinkEngine>>,
) -> HttpResponse {
    let code = path.into_inner();
    let result = engine
        .analytics(&code, query.owner())
        .await
        .map(|stats| AnalyticsResponse::new(code, stats));
    api_result(result)
}

pub async fn list_urls(
    query: web::Query<OwnerQuery>,
    engine: web::Data<Arc<LinkEngine>>,
) -> HttpResponse {
    let result = engine
        .list_owner_links(query.owner())
        .await
        .map(|urls| UrlsResponse { urls });
    api_result(result)
}

pub async fn update_url(
    path: web::Path<String>,
    query: web::Query<OwnerQuery>,
    body: Option<web::Json<UpdateBody>>,
    engine: web::Data<Arc<LinkEngine>>,
) -> HttpResponse {
    let id = path.into_inner();
    let alias = body.and_then(|b| b.into_inner().custom_alias);

    let result = engine
        .rename(&id, query.owner(), alias.as_deref())
        .await
        .map(|_| MessageBody {
            message: "URL updated successfully",
        });
    api_result(result)
}

pub async fn delete_url(
    path: web::Path<String>,
    query: web::Query<OwnerQuery>,
    engine: web::Data<Arc<LinkEngine>>,
) -> HttpResponse {
    let id = path.into_inner();
    let result = engine
        .delete(&id, query.owner())
        .await
        .map(|_| MessageBody {
            message: "URL deleted successfully",
        });
    api_result(result)
}

pub async fn health(health: web::Data<Arc<HealthService>>) -> HttpResponse {
    let report = health.check().await;
    let status = if report.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json_response(status, &report)
}

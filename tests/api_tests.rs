//! HTTP transport tests
//!
//! Drives the actix-web routes end to end with a SQLite store and the
//! in-process moka cache.

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use quicklink::api::configure_routes;
use quicklink::cache::{KvCache, MokaCache};
use quicklink::services::{HealthService, LinkEngine};

use common::{FailingCache, cache_layer, create_engine, create_test_store};

macro_rules! test_app {
    ($store:expr, $cache:expr) => {{
        let cache: Arc<dyn KvCache> = $cache;
        let engine: Arc<LinkEngine> = Arc::new(create_engine($store.clone(), cache.clone()));
        let health = Arc::new(HealthService::new($store.clone(), cache_layer(cache)));
        test::init_service(
            App::new()
                .app_data(web::Data::new(engine))
                .app_data(web::Data::new(health))
                .configure(configure_routes),
        )
        .await
    }};
}

#[actix_rt::test]
async fn test_shorten_and_redirect() {
    let (store, _dir) = create_test_store().await;
    let app = test_app!(store, Arc::new(MokaCache::new(100)));

    let req = TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "url": "example.com/page", "user_id": "u1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["original_url"], "http://example.com/page");
    let code = body["code"].as_str().unwrap().to_string();
    assert_eq!(
        body["short_url"],
        format!("http://localhost:8501/{}", code)
    );

    let req = TestRequest::get()
        .uri(&format!("/{}", code))
        .insert_header(("User-Agent", "api-test"))
        .insert_header(("X-Forwarded-For", "203.0.113.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap().to_str().unwrap(),
        "http://example.com/page"
    );

    let req = TestRequest::get()
        .uri(&format!("/analytics/{}?user_id=u1", code))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["short_url"], code);
    assert_eq!(body["total_clicks"], 1);
    assert_eq!(body["clicks"][0]["user_agent"], "api-test");
}

#[actix_rt::test]
async fn test_shorten_errors() {
    let (store, _dir) = create_test_store().await;
    let app = test_app!(store, Arc::new(MokaCache::new(100)));

    let req = TestRequest::post()
        .uri("/shorten")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MISSING_URL");
    assert_eq!(body["error"], "URL is required");

    let req = TestRequest::post()
        .uri("/shorten")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MISSING_URL");

    let req = TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "url": "javascript:alert(1)" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], "INVALID_URL");

    for (alias, code) in [
        ("ab", "INVALID_ALIAS_LENGTH"),
        ("ab cd", "INVALID_ALIAS"),
        (" my-link ", "INVALID_ALIAS"),
        ("health", "ALIAS_TAKEN"),
        ("urls", "ALIAS_TAKEN"),
    ] {
        let req = TestRequest::post()
            .uri("/shorten")
            .set_json(json!({ "url": "example.com", "custom_alias": alias }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], code);
    }

    let shorten_alias = || {
        TestRequest::post()
            .uri("/shorten")
            .set_json(json!({ "url": "example.com", "custom_alias": "my-link1" }))
            .to_request()
    };
    let resp = test::call_service(&app, shorten_alias()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, shorten_alias()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "ALIAS_TAKEN");
}

#[actix_rt::test]
async fn test_unknown_code_is_json_404() {
    let (store, _dir) = create_test_store().await;
    let app = test_app!(store, Arc::new(MokaCache::new(100)));

    let req = TestRequest::get().uri("/nope1234").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_owner_endpoints() {
    let (store, _dir) = create_test_store().await;
    let app = test_app!(store, Arc::new(MokaCache::new(100)));

    let req = TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "url": "https://example.com/mine", "user_id": "u1" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    // 列表
    let req = TestRequest::get().uri("/urls").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MISSING_USER_ID");

    let req = TestRequest::get().uri("/urls?user_id=u1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let urls = body["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0]["id"], id.as_str());
    assert_eq!(
        urls[0]["full_short_url"],
        format!("http://localhost:5000/{}", created["code"].as_str().unwrap())
    );

    // 统计：非 owner
    let req = TestRequest::get()
        .uri(&format!(
            "/analytics/{}?user_id=u2",
            created["code"].as_str().unwrap()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 更新
    let req = TestRequest::put()
        .uri(&format!("/urls/{}?user_id=u1", id))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NO_CHANGES");

    let req = TestRequest::put()
        .uri(&format!("/urls/{}?user_id=u1", id))
        .set_json(json!({ "custom_alias": "renamed-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/renamed-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    // 删除
    let req = TestRequest::delete()
        .uri(&format!("/urls/{}?user_id=u2", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::delete()
        .uri(&format!("/urls/{}?user_id=u1", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/renamed-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_reports_degraded_cache() {
    let (store, _dir) = create_test_store().await;

    let app = test_app!(store, Arc::new(MokaCache::new(100)));
    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["links_count"], 0);
    assert_eq!(body["checks"]["cache"]["backend"], "memory");

    let app = test_app!(store, Arc::new(FailingCache));
    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["cache"]["status"], "unhealthy");
}

//! 客户端信息提取

use actix_web::HttpRequest;
use actix_web::http::header::{HeaderMap, USER_AGENT};

/// First hop of `X-Forwarded-For`, then `X-Real-IP`.
pub fn forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Forwarded address if a proxy set one, otherwise the peer address.
pub fn client_address(req: &HttpRequest) -> Option<String> {
    forwarded_ip_from_headers(req.headers()).or_else(|| req.peer_addr().map(|a| a.ip().to_string()))
}

pub fn client_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_first_hop() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(client_address(&req).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_address(&req).as_deref(), Some("198.51.100.2"));
    }

    #[test]
    fn test_peer_addr_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .insert_header((USER_AGENT, "curl/8.0"))
            .to_http_request();
        assert_eq!(client_address(&req).as_deref(), Some("192.0.2.1"));
        assert_eq!(client_agent(&req).as_deref(), Some("curl/8.0"));
    }
}

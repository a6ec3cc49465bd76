//! URL 验证与规范化
//!
//! Accepts absolute http(s) URLs and bare `host/path` forms, which are
//! normalized by prefixing `http://`.

use std::net::IpAddr;

use url::{Host, Url};

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidHost(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL is required"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidHost(host) => write!(f, "Invalid host: {}", host),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

fn has_http_scheme(lower: &str) -> bool {
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Prefix `http://` when the URL carries no scheme. Input is trimmed;
/// nothing else about the URL is rewritten.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if has_http_scheme(&url.to_lowercase()) {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// 验证 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 有协议时必须是 http:// 或 https://
/// 4. 主机名是域名（含顶级域）、localhost 或 IP
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    if url.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::InvalidFormat(
            "URL must not contain whitespace".to_string(),
        ));
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if let Some((scheme, _)) = url_lower.split_once("://") {
        if scheme != "http" && scheme != "https" {
            return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme)));
        }
    } else {
        // 无协议：`host:port` 合法，`mailto:x@y` 之类视为未知协议
        let head = url_lower
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        if let Some((scheme, rest)) = head.split_once(':')
            && (rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme)));
        }
    }

    let parsed = Url::parse(&normalize_url(url))
        .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.host() {
        Some(Host::Domain(domain)) => validate_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        None => Err(UrlValidationError::InvalidHost(String::new())),
    }
}

fn validate_domain(domain: &str) -> Result<(), UrlValidationError> {
    if domain == "localhost" || domain.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    if labels.len() >= 2 && tld_ok && labels_ok {
        Ok(())
    } else {
        Err(UrlValidationError::InvalidHost(domain.to_string()))
    }
}

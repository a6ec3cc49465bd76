//! Request / response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::LinkView;
use crate::storage::AccessStats;

#[derive(Debug, Default, Deserialize)]
pub struct ShortenBody {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde(default)]
    pub frontend_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub custom_alias: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl OwnerQuery {
    pub fn owner(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UrlsResponse {
    pub urls: Vec<LinkView>,
}

#[derive(Debug, Serialize)]
pub struct ClickView {
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub short_url: String,
    pub total_clicks: u64,
    pub clicks: Vec<ClickView>,
}

impl AnalyticsResponse {
    pub fn new(code: String, stats: AccessStats) -> Self {
        Self {
            short_url: code,
            total_clicks: stats.total_clicks,
            clicks: stats
                .records
                .into_iter()
                .map(|record| ClickView {
                    timestamp: record.timestamp,
                    user_agent: record.client_agent,
                })
                .collect(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
}

impl ShortLink {
    /// A fresh record with a generated id, stamped now.
    pub fn new(
        code: impl Into<String>,
        original_url: impl Into<String>,
        owner_id: Option<String>,
        is_custom: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.into(),
            original_url: original_url.into(),
            owner_id,
            created_at: Utc::now(),
            is_custom,
        }
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id.as_deref() == Some(owner_id)
    }
}

/// One successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub code: String,
    pub timestamp: DateTime<Utc>,
    pub client_agent: Option<String>,
    pub client_address: Option<String>,
}

impl AccessRecord {
    pub fn now(
        code: impl Into<String>,
        client_agent: Option<String>,
        client_address: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            timestamp: Utc::now(),
            client_agent,
            client_address,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessStats {
    pub total_clicks: u64,
    /// Oldest first.
    pub records: Vec<AccessRecord>,
}

use sea_orm::ActiveValue::{NotSet, Set};

use crate::storage::{AccessRecord, ShortLink};
use migration::entities::{access, link};

/// 将 Sea-ORM Model 转换为 ShortLink
pub fn model_to_shortlink(model: link::Model) -> ShortLink {
    ShortLink {
        id: model.id,
        code: model.code,
        original_url: model.original_url,
        owner_id: model.owner_id,
        created_at: model.created_at,
        is_custom: model.is_custom,
    }
}

/// 将 ShortLink 转换为 ActiveModel（仅用于插入）
pub fn shortlink_to_active_model(link: &ShortLink) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(link.id.clone()),
        code: Set(link.code.clone()),
        original_url: Set(link.original_url.clone()),
        owner_id: Set(link.owner_id.clone()),
        created_at: Set(link.created_at),
        is_custom: Set(link.is_custom),
    }
}

pub fn model_to_access(model: access::Model) -> AccessRecord {
    AccessRecord {
        code: model.code,
        timestamp: model.accessed_at,
        client_agent: model.client_agent,
        client_address: model.client_address,
    }
}

pub fn access_to_active_model(record: &AccessRecord) -> access::ActiveModel {
    access::ActiveModel {
        id: NotSet,
        code: Set(record.code.clone()),
        accessed_at: Set(record.timestamp),
        client_agent: Set(record.client_agent.clone()),
        client_address: Set(record.client_address.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    #[test]
    fn test_model_to_shortlink() {
        let now = Utc::now();
        let model = link::Model {
            id: "id-1".to_string(),
            code: "abcd1234".to_string(),
            original_url: "http://example.com".to_string(),
            owner_id: Some("owner".to_string()),
            created_at: now,
            is_custom: false,
        };

        let link = model_to_shortlink(model);
        assert_eq!(link.id, "id-1");
        assert_eq!(link.code, "abcd1234");
        assert_eq!(link.owner_id.as_deref(), Some("owner"));
        assert_eq!(link.created_at, now);
        assert!(!link.is_custom);
    }

    #[test]
    fn test_shortlink_to_active_model_sets_everything() {
        let link = ShortLink::new("my-link", "http://example.com", None, true);
        let am = shortlink_to_active_model(&link);

        assert_eq!(am.id, ActiveValue::Set(link.id.clone()));
        assert_eq!(am.code, ActiveValue::Set("my-link".to_string()));
        assert_eq!(am.owner_id, ActiveValue::Set(None));
        assert_eq!(am.is_custom, ActiveValue::Set(true));
    }

    #[test]
    fn test_access_active_model_leaves_id_unset() {
        let record = AccessRecord::now("abcd", Some("curl/8".to_string()), None);
        let am = access_to_active_model(&record);

        assert!(matches!(am.id, ActiveValue::NotSet));
        assert_eq!(am.client_agent, ActiveValue::Set(Some("curl/8".to_string())));
    }
}

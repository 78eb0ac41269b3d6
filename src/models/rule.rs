//! Detection rule domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::alert::Severity;

/// 流量异常检测规则
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DetectionRule {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub rule_type: String,
    pub conditions: serde_json::Value,
    pub severity: Severity,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建检测规则请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDetectionRuleRequest {
    #[validate(length(min = 1, max = 255, message = "Rule name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Rule type must be 1-100 characters"))]
    pub rule_type: String,
    pub conditions: serde_json::Value,
    pub severity: Severity,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// 更新检测规则请求，未提供的字段保持原值
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDetectionRuleRequest {
    #[validate(length(min = 1, max = 255, message = "Rule name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Rule type must be 1-100 characters"))]
    pub rule_type: Option<String>,
    pub conditions: Option<serde_json::Value>,
    pub severity: Option<Severity>,
}

/// 启用/停用请求
#[derive(Debug, Deserialize)]
pub struct ToggleDetectionRuleRequest {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rule_defaults_active() {
        let req: CreateDetectionRuleRequest = serde_json::from_value(serde_json::json!({
            "name": "Port scan",
            "rule_type": "threshold",
            "conditions": {"connections_per_minute": {"gt": 100}},
            "severity": "high"
        }))
        .unwrap();
        assert!(req.is_active);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let req = CreateDetectionRuleRequest {
            name: String::new(),
            description: None,
            rule_type: "threshold".to_string(),
            conditions: serde_json::json!({}),
            severity: Severity::Low,
            is_active: true,
        };
        assert!(req.validate().is_err());
    }
}

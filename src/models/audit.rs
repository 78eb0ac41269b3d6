//! Audit trail domain models
//!
//! 审计动作是封闭枚举，新增动作必须在此处登记，
//! 避免日志里出现无法归类的自由字符串。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 所有会写入审计日志的敏感操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CreateDevice,
    UpdateDevice,
    DeleteDevice,
    ResolveAlert,
    DismissAlert,
    CreateDetectionRule,
    UpdateDetectionRule,
    ToggleDetectionRule,
    DeleteDetectionRule,
    CreateUser,
    UpdateUserRole,
    UpdateUserStatus,
    DeleteUser,
    UpdateSystemConfig,
}

impl AuditAction {
    /// 写入数据库的动作编码
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateDevice => "CREATE_DEVICE",
            AuditAction::UpdateDevice => "UPDATE_DEVICE",
            AuditAction::DeleteDevice => "DELETE_DEVICE",
            AuditAction::ResolveAlert => "RESOLVE_ALERT",
            AuditAction::DismissAlert => "DISMISS_ALERT",
            AuditAction::CreateDetectionRule => "CREATE_DETECTION_RULE",
            AuditAction::UpdateDetectionRule => "UPDATE_DETECTION_RULE",
            AuditAction::ToggleDetectionRule => "TOGGLE_DETECTION_RULE",
            AuditAction::DeleteDetectionRule => "DELETE_DETECTION_RULE",
            AuditAction::CreateUser => "CREATE_USER",
            AuditAction::UpdateUserRole => "UPDATE_USER_ROLE",
            AuditAction::UpdateUserStatus => "UPDATE_USER_STATUS",
            AuditAction::DeleteUser => "DELETE_USER",
            AuditAction::UpdateSystemConfig => "UPDATE_SYSTEM_CONFIG",
        }
    }

    /// 动作所属的资源类别
    pub fn resource(&self) -> &'static str {
        match self {
            AuditAction::CreateDevice | AuditAction::UpdateDevice | AuditAction::DeleteDevice => {
                "device"
            }
            AuditAction::ResolveAlert | AuditAction::DismissAlert => "alert",
            AuditAction::CreateDetectionRule
            | AuditAction::UpdateDetectionRule
            | AuditAction::ToggleDetectionRule
            | AuditAction::DeleteDetectionRule => "detection_rule",
            AuditAction::CreateUser
            | AuditAction::UpdateUserRole
            | AuditAction::UpdateUserStatus
            | AuditAction::DeleteUser => "user",
            AuditAction::UpdateSystemConfig => "system_config",
        }
    }

    pub fn all() -> &'static [AuditAction] {
        &[
            AuditAction::CreateDevice,
            AuditAction::UpdateDevice,
            AuditAction::DeleteDevice,
            AuditAction::ResolveAlert,
            AuditAction::DismissAlert,
            AuditAction::CreateDetectionRule,
            AuditAction::UpdateDetectionRule,
            AuditAction::ToggleDetectionRule,
            AuditAction::DeleteDetectionRule,
            AuditAction::CreateUser,
            AuditAction::UpdateUserRole,
            AuditAction::UpdateUserStatus,
            AuditAction::DeleteUser,
            AuditAction::UpdateSystemConfig,
        ]
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 审计日志记录
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 审计日志查询条件
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

impl AuditLogQuery {
    pub fn normalized(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, 200);
        let page = self.page.max(1);
        (limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes_are_screaming_snake() {
        for action in AuditAction::all() {
            let code = action.as_str();
            assert!(!code.is_empty());
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_action_codes_unique() {
        let mut codes: Vec<&str> = AuditAction::all().iter().map(|a| a.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), AuditAction::all().len());
    }

    #[test]
    fn test_resource_mapping() {
        assert_eq!(AuditAction::ResolveAlert.resource(), "alert");
        assert_eq!(AuditAction::UpdateSystemConfig.resource(), "system_config");
        assert_eq!(AuditAction::ToggleDetectionRule.resource(), "detection_rule");
    }

    #[test]
    fn test_query_normalization() {
        let q = AuditLogQuery {
            page: 0,
            limit: 1000,
            ..Default::default()
        };
        let (limit, offset) = q.normalized();
        assert_eq!(limit, 200);
        assert_eq!(offset, 0);

        let q = AuditLogQuery {
            page: 3,
            limit: 20,
            ..Default::default()
        };
        assert_eq!(q.normalized(), (20, 40));
    }
}

//! Alert domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 告警严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// 告警状态
/// 状态流转是单向的：pending → {resolved | dismissed}，不支持重新打开
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Processing,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    /// 终态告警不再接受状态变更
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::Dismissed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Processing => "processing",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Dismissed => "dismissed",
        }
    }
}

/// Detected anomaly event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Alert {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub source_ip: Option<String>,
    pub rule_id: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
}

/// Alert list query
#[derive(Debug, Deserialize)]
pub struct AlertListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

impl AlertListQuery {
    pub fn normalized(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, 200);
        let page = self.page.max(1);
        (limit, (page - 1) * limit)
    }
}

/// 按严重级别统计的未处理告警数量
#[derive(Debug, Serialize)]
pub struct AlertStats {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub resolved: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(AlertStatus::Resolved.is_terminal());
        assert!(AlertStatus::Dismissed.is_terminal());
        assert!(!AlertStatus::Pending.is_terminal());
        assert!(!AlertStatus::Processing.is_terminal());
    }

    #[test]
    fn test_severity_serde() {
        let s: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(s, Severity::High);
        assert!(serde_json::from_str::<Severity>("\"critical\"").is_err());
    }
}

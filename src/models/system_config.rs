//! System configuration models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 系统配置项，key 全局唯一
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SystemConfig {
    pub id: i32,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// 更新配置请求，按 key upsert
#[derive(Debug, Deserialize)]
pub struct UpdateSystemConfigRequest {
    pub value: serde_json::Value,
    pub description: Option<String>,
}

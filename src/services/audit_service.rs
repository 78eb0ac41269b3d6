//! 审计日志服务
//!
//! 审计写入失败不会导致业务操作回滚，只记录错误日志。
//! 业务变更提交后再写审计，这里的失败对调用方不可见。

use crate::{
    error::AppError,
    models::audit::{AuditAction, AuditLog, AuditLogQuery},
    repository::{audit_repo::NewAuditLog, AuditRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

/// 一次敏感操作的审计参数
#[derive(Debug)]
pub struct AuditEntry<'a> {
    pub user_id: Uuid,
    pub action: AuditAction,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 记录审计日志，写入失败只告警不向上传播
    pub async fn record(&self, entry: AuditEntry<'_>) {
        let repo = AuditRepository::new(self.db.clone());

        let log = NewAuditLog {
            user_id: entry.user_id,
            action: entry.action,
            resource_id: entry.resource_id,
            details: entry.details,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
        };

        if let Err(e) = repo.insert(&log).await {
            tracing::error!(
                action = %entry.action,
                user_id = %entry.user_id,
                error = ?e,
                "Failed to write audit log"
            );
        }
    }

    /// 查询审计日志
    pub async fn query_logs(
        &self,
        filters: &AuditLogQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>, AppError> {
        let repo = AuditRepository::new(self.db.clone());
        repo.query(filters, limit, offset).await
    }

    /// 查询审计日志数量
    pub async fn count_logs(&self, filters: &AuditLogQuery) -> Result<i64, AppError> {
        let repo = AuditRepository::new(self.db.clone());
        repo.count(filters).await
    }
}

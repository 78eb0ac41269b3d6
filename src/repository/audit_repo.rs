//! Audit repository (审计数据访问)
//!
//! 审计日志只追加，不提供更新和删除接口。

use crate::{error::AppError, models::audit::*};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct AuditRepository {
    db: PgPool,
}

/// 待写入的审计记录
#[derive(Debug)]
pub struct NewAuditLog<'a> {
    pub user_id: Uuid,
    pub action: AuditAction,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

impl AuditRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 插入审计日志
    pub async fn insert(&self, log: &NewAuditLog<'_>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (user_id, action, resource, resource_id, details, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(log.user_id)
        .bind(log.action.as_str())
        .bind(log.action.resource())
        .bind(&log.resource_id)
        .bind(&log.details)
        .bind(log.ip_address)
        .bind(log.user_agent)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 查询审计日志
    pub async fn query(
        &self,
        filters: &AuditLogQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>, AppError> {
        let mut query = String::from("SELECT * FROM audit_logs WHERE 1=1");
        let mut index = 0;

        if filters.user_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND user_id = ${}", index));
        }
        if filters.action.is_some() {
            index += 1;
            query.push_str(&format!(" AND action = ${}", index));
        }
        if filters.start_date.is_some() {
            index += 1;
            query.push_str(&format!(" AND timestamp >= ${}", index));
        }
        if filters.end_date.is_some() {
            index += 1;
            query.push_str(&format!(" AND timestamp <= ${}", index));
        }

        query.push_str(&format!(
            " ORDER BY timestamp DESC LIMIT ${} OFFSET ${}",
            index + 1,
            index + 2
        ));

        let mut query_builder = sqlx::query_as::<_, AuditLog>(&query);

        if let Some(user_id) = filters.user_id {
            query_builder = query_builder.bind(user_id);
        }
        if let Some(action) = &filters.action {
            query_builder = query_builder.bind(action);
        }
        if let Some(start_date) = filters.start_date {
            query_builder = query_builder.bind(start_date);
        }
        if let Some(end_date) = filters.end_date {
            query_builder = query_builder.bind(end_date);
        }

        let logs = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(logs)
    }

    /// 统计符合条件的审计日志数量
    pub async fn count(&self, filters: &AuditLogQuery) -> Result<i64, AppError> {
        let mut query = String::from("SELECT COUNT(*) FROM audit_logs WHERE 1=1");
        let mut index = 0;

        if filters.user_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND user_id = ${}", index));
        }
        if filters.action.is_some() {
            index += 1;
            query.push_str(&format!(" AND action = ${}", index));
        }
        if filters.start_date.is_some() {
            index += 1;
            query.push_str(&format!(" AND timestamp >= ${}", index));
        }
        if filters.end_date.is_some() {
            index += 1;
            query.push_str(&format!(" AND timestamp <= ${}", index));
        }

        let mut query_builder = sqlx::query(&query);

        if let Some(user_id) = filters.user_id {
            query_builder = query_builder.bind(user_id);
        }
        if let Some(action) = &filters.action {
            query_builder = query_builder.bind(action);
        }
        if let Some(start_date) = filters.start_date {
            query_builder = query_builder.bind(start_date);
        }
        if let Some(end_date) = filters.end_date {
            query_builder = query_builder.bind(end_date);
        }

        let count: i64 = query_builder.fetch_one(&self.db).await?.get(0);
        Ok(count)
    }
}

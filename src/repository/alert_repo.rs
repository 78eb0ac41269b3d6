//! Alert repository (数据库访问层)

use crate::{error::AppError, models::alert::*};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct AlertRepository {
    db: PgPool,
}

impl AlertRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按条件分页查询告警
    pub async fn list(
        &self,
        severity: Option<Severity>,
        status: Option<AlertStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE ($1::alert_severity IS NULL OR severity = $1)
              AND ($2::alert_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(severity)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// 根据 ID 查找告警
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(alert)
    }

    /// 最近产生的告警（仪表盘用）
    pub async fn recent(&self, limit: i64) -> Result<Vec<Alert>, AppError> {
        let alerts =
            sqlx::query_as::<_, Alert>("SELECT * FROM alerts ORDER BY created_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&self.db)
                .await?;

        Ok(alerts)
    }

    /// 按严重级别统计待处理告警数量，另附已解决总数
    pub async fn stats(&self) -> Result<AlertStats, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE severity = 'low' AND status = 'pending') AS low,
                COUNT(*) FILTER (WHERE severity = 'medium' AND status = 'pending') AS medium,
                COUNT(*) FILTER (WHERE severity = 'high' AND status = 'pending') AS high,
                COUNT(*) FILTER (WHERE status = 'resolved') AS resolved
            FROM alerts
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(AlertStats {
            low: row.get("low"),
            medium: row.get("medium"),
            high: row.get("high"),
            resolved: row.get("resolved"),
        })
    }

    /// 将告警置为终态，仅当当前状态不是终态时生效。
    /// 返回 None 表示没有可变更的行（不存在或已是终态），由调用方区分。
    pub async fn close(
        &self,
        id: i32,
        target: AlertStatus,
        resolved_by: Uuid,
    ) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET
                status = $2,
                resolved_by = $3,
                resolved_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('resolved', 'dismissed')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(target)
        .bind(resolved_by)
        .fetch_optional(&self.db)
        .await?;

        Ok(alert)
    }

    /// 统计待处理告警数量
    pub async fn count_pending(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM alerts WHERE status = 'pending'")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}

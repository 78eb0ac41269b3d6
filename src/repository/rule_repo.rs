//! Detection rule repository (数据库访问层)

use crate::{error::AppError, models::rule::*};
use sqlx::PgPool;
use uuid::Uuid;

pub struct DetectionRuleRepository {
    db: PgPool,
}

impl DetectionRuleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有检测规则
    pub async fn list(&self) -> Result<Vec<DetectionRule>, AppError> {
        let rules = sqlx::query_as::<_, DetectionRule>(
            "SELECT * FROM detection_rules ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rules)
    }

    /// 根据 ID 查找规则
    pub async fn find_by_id(&self, id: i32) -> Result<Option<DetectionRule>, AppError> {
        let rule = sqlx::query_as::<_, DetectionRule>("SELECT * FROM detection_rules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(rule)
    }

    /// 创建检测规则
    pub async fn create(
        &self,
        req: &CreateDetectionRuleRequest,
        created_by: Uuid,
    ) -> Result<DetectionRule, AppError> {
        let rule = sqlx::query_as::<_, DetectionRule>(
            r#"
            INSERT INTO detection_rules (name, description, rule_type, conditions, severity, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.rule_type)
        .bind(&req.conditions)
        .bind(req.severity)
        .bind(req.is_active)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(rule)
    }

    /// 更新检测规则，未提供的字段保持原值
    pub async fn update(
        &self,
        id: i32,
        req: &UpdateDetectionRuleRequest,
    ) -> Result<Option<DetectionRule>, AppError> {
        let rule = sqlx::query_as::<_, DetectionRule>(
            r#"
            UPDATE detection_rules
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                rule_type = COALESCE($4, rule_type),
                conditions = COALESCE($5, conditions),
                severity = COALESCE($6::alert_severity, severity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.rule_type)
        .bind(&req.conditions)
        .bind(req.severity)
        .fetch_optional(&self.db)
        .await?;

        Ok(rule)
    }

    /// 启用/停用规则
    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<Option<DetectionRule>, AppError> {
        let rule = sqlx::query_as::<_, DetectionRule>(
            r#"
            UPDATE detection_rules
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(rule)
    }

    /// 删除规则
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM detection_rules WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! System config repository (数据库访问层)

use crate::{error::AppError, models::system_config::*};
use sqlx::PgPool;
use uuid::Uuid;

pub struct SystemConfigRepository {
    db: PgPool,
}

impl SystemConfigRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有配置项
    pub async fn list(&self) -> Result<Vec<SystemConfig>, AppError> {
        let configs =
            sqlx::query_as::<_, SystemConfig>("SELECT * FROM system_config ORDER BY key")
                .fetch_all(&self.db)
                .await?;

        Ok(configs)
    }

    /// 按 key 更新配置，不存在则插入
    pub async fn upsert(
        &self,
        key: &str,
        req: &UpdateSystemConfigRequest,
        updated_by: Uuid,
    ) -> Result<SystemConfig, AppError> {
        let config = sqlx::query_as::<_, SystemConfig>(
            r#"
            INSERT INTO system_config (key, value, description, updated_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO UPDATE
            SET
                value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, system_config.description),
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(&req.value)
        .bind(&req.description)
        .bind(updated_by)
        .fetch_one(&self.db)
        .await?;

        Ok(config)
    }
}

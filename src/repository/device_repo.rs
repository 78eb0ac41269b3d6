//! Device repository (数据库访问层)

use crate::{
    error::{map_unique_violation, AppError},
    models::device::*,
};
use sqlx::{PgPool, Row};

pub struct DeviceRepository {
    db: PgPool,
}

impl DeviceRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有设备
    pub async fn list(&self) -> Result<Vec<Device>, AppError> {
        let devices = sqlx::query_as::<_, Device>("SELECT * FROM devices ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;

        Ok(devices)
    }

    /// 根据 ID 查找设备
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Device>, AppError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(device)
    }

    /// 创建设备，IP 地址冲突时返回 Conflict
    pub async fn create(&self, req: &CreateDeviceRequest) -> Result<Device, AppError> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (name, ip_address, device_type, protocol, status, description)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'offline'::device_status), $6)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.ip_address)
        .bind(&req.device_type)
        .bind(req.protocol)
        .bind(req.status)
        .bind(&req.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Device with this IP address already exists"))?;

        Ok(device)
    }

    /// 更新设备，未提供的字段保持原值
    pub async fn update(
        &self,
        id: i32,
        req: &UpdateDeviceRequest,
    ) -> Result<Option<Device>, AppError> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            UPDATE devices
            SET
                name = COALESCE($2, name),
                ip_address = COALESCE($3, ip_address),
                device_type = COALESCE($4, device_type),
                protocol = COALESCE($5, protocol),
                status = COALESCE($6, status),
                description = COALESCE($7, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.ip_address)
        .bind(&req.device_type)
        .bind(req.protocol)
        .bind(req.status)
        .bind(&req.description)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Device with this IP address already exists"))?;

        Ok(device)
    }

    /// 删除设备
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 统计在线设备数量
    pub async fn count_online(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM devices WHERE status = 'online'")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}

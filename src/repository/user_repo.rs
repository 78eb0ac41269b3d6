//! User repository (数据库访问层)

use crate::{
    error::{map_unique_violation, AppError},
    models::user::*,
};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 创建用户，用户名或邮箱冲突时返回 Conflict
    pub async fn create(
        &self,
        req: &CreateUserRequest,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.username)
        .bind(&req.email)
        .bind(password_hash)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

        Ok(user)
    }

    /// 更新用户角色
    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新用户启用状态
    pub async fn update_status(&self, id: Uuid, is_active: bool) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 删除用户
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 统计仍引用该用户的历史记录（审计日志、告警处理记录）
    pub async fn count_references(&self, id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM audit_logs WHERE user_id = $1)
                + (SELECT COUNT(*) FROM alerts WHERE resolved_by = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(count)
    }

    /// 列出所有用户
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;

        Ok(users)
    }

    /// 统计用户数量
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}

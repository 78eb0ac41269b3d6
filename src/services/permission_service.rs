//! 权限检查服务
//!
//! 管理操作不信任会话中的角色快照，每次授权都重新查询数据库，
//! 降级或停用立即生效。

use crate::{
    error::AppError,
    models::user::{Role, User},
    repository::UserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PermissionService {
    db: PgPool,
}

impl PermissionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 重新加载用户并确认其仍然有效
    pub async fn load_active_user(&self, user_id: Uuid) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            tracing::warn!(user_id = %user_id, "Inactive user attempted an operation");
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// 要求管理员权限，角色以数据库当前值为准
    pub async fn require_admin(&self, user_id: Uuid) -> Result<User, AppError> {
        let user = self.load_active_user(user_id).await?;

        if user.role != Role::Admin {
            tracing::warn!(
                user_id = %user_id,
                role = %user.role,
                "Permission denied: admin required"
            );
            return Err(AppError::Forbidden);
        }

        Ok(user)
    }

    /// 禁止管理员对自己执行角色/状态/删除操作
    pub fn ensure_not_self(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        if actor_id == target_id {
            tracing::warn!(user_id = %actor_id, "Self-modification attempt blocked");
            return Err(AppError::Forbidden);
        }

        Ok(())
    }
}

//! 认证服务：登录、登出、当前用户

use crate::{
    auth::password::PasswordHasher,
    auth::session::SessionManager,
    error::AppError,
    models::user::*,
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// 登录结果：下发给客户端的令牌与用户信息
pub struct LoginOutcome {
    pub token: String,
    pub user: UserResponse,
}

pub struct AuthService {
    db: PgPool,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(db: PgPool, sessions: Arc<SessionManager>) -> Self {
        Self { db, sessions }
    }

    /// 用户登录
    ///
    /// 用户不存在、已停用、密码错误一律返回 Unauthorized，
    /// 不向调用方泄露失败原因。
    pub async fn login(&self, req: &LoginRequest, client_ip: &str) -> Result<LoginOutcome, AppError> {
        if req.username.is_empty() || req.password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let user_repo = UserRepository::new(self.db.clone());

        let user: User = user_repo
            .find_by_username(&req.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            tracing::warn!(username = %req.username, %client_ip, "Login attempt on inactive account");
            return Err(AppError::Unauthorized);
        }

        // 验证密码
        let hasher = PasswordHasher::new();
        hasher.verify(&req.password, &user.password_hash)?;

        let token = self.sessions.create(user.id, &user.username, user.role);

        tracing::info!(user_id = %user.id, username = %user.username, %client_ip, "User logged in");

        Ok(LoginOutcome {
            token,
            user: UserResponse::from(user),
        })
    }

    /// 登出，对无效令牌静默成功
    pub fn logout(&self, token: &str) {
        self.sessions.destroy(token);
    }

    /// 当前用户：重新查库确认账号仍然有效
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(UserResponse::from(user))
    }
}

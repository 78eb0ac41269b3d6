//! 会话认证中间件

use crate::{auth::session::SessionManager, error::AppError, models::user::Role};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    /// 登录时的角色快照，敏感操作前需重新查库确认
    pub role: Role,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Cookie 头中取出指定名称的会话令牌
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, AppError> {
    let header = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == cookie_name {
                Some(value.to_string())
            } else {
                None
            }
        })
        .next()
        .ok_or(AppError::Unauthorized)
}

/// 会话认证中间件 - 必须认证
pub async fn session_auth_middleware(
    State((sessions, cookie_name)): State<(Arc<SessionManager>, String)>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Cookie 头提取令牌
    let token = extract_session_token(req.headers(), &cookie_name)?;

    // 查找会话，过期或不存在都视为未认证
    let session = sessions.resolve(&token).ok_or(AppError::Unauthorized)?;

    let auth_context = AuthContext {
        user_id: session.user_id,
        username: session.username,
        role: session.role,
    };

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::{extract_session_token, AuthContext},
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::user::LoginRequest,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 登录，成功后通过 HttpOnly Cookie 下发会话令牌
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    let outcome = state.auth_service.login(&req, &client_ip).await?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.config.security.session_cookie_name,
        outcome.token,
        state.config.security.session_ttl_secs
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::Internal("Failed to build session cookie".to_string()))?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::SET_COOKIE, cookie);

    Ok((
        response_headers,
        Json(json!({
            "message": "登录成功",
            "user": outcome.user
        })),
    ))
}

/// 登出，销毁会话并清除 Cookie。对无效或缺失的令牌同样返回成功
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let cookie_name = &state.config.security.session_cookie_name;

    if let Ok(token) = extract_session_token(&headers, cookie_name) {
        state.auth_service.logout(&token);
    }

    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", cookie_name);
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::Internal("Failed to build session cookie".to_string()))?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::SET_COOKIE, cookie);

    Ok((response_headers, Json(json!({"message": "已成功登出"}))))
}

/// 获取当前用户信息，以数据库中的最新状态为准
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.current_user(auth_context.user_id).await?;

    Ok(Json(user))
}

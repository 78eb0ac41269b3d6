//! 系统配置的 HTTP 处理器（仅限管理员）

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::{get_client_ip, get_user_agent, AppState},
    models::{audit::AuditAction, system_config::*},
    repository::SystemConfigRepository,
    services::audit_service::AuditEntry,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 列出所有配置项
pub async fn list_system_config(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    let repo = SystemConfigRepository::new(state.db.clone());
    let configs = repo.list().await?;

    Ok(Json(configs))
}

/// 按 key 更新配置，不存在则创建
pub async fn update_system_config(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateSystemConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    if key.is_empty() || key.len() > 255 {
        return Err(AppError::Validation(
            "Config key must be 1-255 characters".to_string(),
        ));
    }

    let repo = SystemConfigRepository::new(state.db.clone());
    let config = repo.upsert(&key, &req, auth_context.user_id).await?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::UpdateSystemConfig,
            resource_id: Some(config.key.clone()),
            details: Some(json!({"key": config.key})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(Json(json!({
        "message": "系统配置更新成功",
        "config": config
    })))
}

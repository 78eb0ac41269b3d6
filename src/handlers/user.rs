//! 用户管理的 HTTP 处理器
//!
//! 所有操作仅限管理员，授权以数据库中的当前角色为准，
//! 不使用会话中的角色快照。

use crate::{
    auth::middleware::AuthContext,
    auth::password::PasswordHasher,
    error::AppError,
    middleware::{get_client_ip, get_user_agent, AppState},
    models::{audit::AuditAction, user::*},
    repository::UserRepository,
    services::audit_service::AuditEntry,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    let repo = UserRepository::new(state.db.clone());
    let users = repo.list().await?;

    let user_responses: Vec<UserResponse> = users.into_iter().map(|u| u.into()).collect();

    Ok(Json(json!({
        "users": user_responses,
        "count": user_responses.len()
    })))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    req.validate()?;

    // 验证密码策略
    PasswordHasher::validate_password_policy(&req.password, &state.config)?;

    // 哈希密码
    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(&req.password)?;

    let role = req.role.unwrap_or(Role::Readonly);

    let repo = UserRepository::new(state.db.clone());
    let user = repo.create(&req, &password_hash, role).await?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::CreateUser,
            resource_id: Some(user.id.to_string()),
            details: Some(json!({"username": user.username, "role": user.role})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "用户创建成功",
            "user": UserResponse::from(user)
        })),
    ))
}

/// 修改用户角色
pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateUserRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    // 不允许修改自己的角色
    state
        .permission_service
        .ensure_not_self(auth_context.user_id, id)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .update_role(id, req.role)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::UpdateUserRole,
            resource_id: Some(user.id.to_string()),
            details: Some(json!({"username": user.username, "role": user.role})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(Json(json!({
        "message": "用户角色更新成功",
        "user": UserResponse::from(user)
    })))
}

/// 启用/停用用户
pub async fn update_user_status(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateUserStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    // 不允许停用自己的账号
    state
        .permission_service
        .ensure_not_self(auth_context.user_id, id)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .update_status(id, req.is_active)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    // 停用账号时立即吊销其所有会话
    if !user.is_active {
        let revoked = state.sessions.destroy_user_sessions(user.id);
        if revoked > 0 {
            tracing::info!(user_id = %user.id, revoked, "Revoked sessions for deactivated user");
        }
    }

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::UpdateUserStatus,
            resource_id: Some(user.id.to_string()),
            details: Some(json!({"username": user.username, "is_active": user.is_active})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(Json(json!({
        "message": if user.is_active { "用户已启用" } else { "用户已停用" },
        "user": UserResponse::from(user)
    })))
}

/// 删除用户
///
/// 删除是不可逆操作，要求 `?confirm=<username>` 与目标用户名一致。
/// 仍被审计日志或告警处理记录引用的用户不允许删除，应改为停用。
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteUserQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_admin(auth_context.user_id)
        .await?;

    // 不允许删除自己的账户
    state
        .permission_service
        .ensure_not_self(auth_context.user_id, id)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    match query.confirm.as_deref() {
        Some(confirm) if confirm == user.username => {}
        _ => {
            return Err(AppError::BadRequest(
                "Deletion requires confirm=<username> matching the target user".to_string(),
            ))
        }
    }

    let references = repo.count_references(id).await?;
    if references > 0 {
        return Err(AppError::conflict(
            "User is referenced by audit or alert history; deactivate instead",
        ));
    }

    repo.delete(id).await?;

    // 清理该用户的会话
    state.sessions.destroy_user_sessions(id);

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::DeleteUser,
            resource_id: Some(id.to_string()),
            details: Some(json!({"username": user.username})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(StatusCode::NO_CONTENT)
}

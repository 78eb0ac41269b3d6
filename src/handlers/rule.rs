//! 检测规则管理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::{get_client_ip, get_user_agent, AppState},
    models::{audit::AuditAction, rule::*},
    repository::DetectionRuleRepository,
    services::audit_service::AuditEntry,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 列出检测规则
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = DetectionRuleRepository::new(state.db.clone());
    let rules = repo.list().await?;

    Ok(Json(rules))
}

/// 创建检测规则
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    headers: HeaderMap,
    Json(req): Json<CreateDetectionRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = DetectionRuleRepository::new(state.db.clone());
    let rule = repo.create(&req, auth_context.user_id).await?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::CreateDetectionRule,
            resource_id: Some(rule.id.to_string()),
            details: Some(json!({"name": rule.name, "rule_type": rule.rule_type})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "检测规则创建成功",
            "rule": rule
        })),
    ))
}

/// 更新检测规则
pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(req): Json<UpdateDetectionRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = DetectionRuleRepository::new(state.db.clone());
    let rule = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Detection rule"))?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::UpdateDetectionRule,
            resource_id: Some(rule.id.to_string()),
            details: Some(json!({"name": rule.name})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(Json(json!({
        "message": "检测规则更新成功",
        "rule": rule
    })))
}

/// 启用/停用检测规则
pub async fn toggle_rule(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(req): Json<ToggleDetectionRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repo = DetectionRuleRepository::new(state.db.clone());
    let rule = repo
        .set_active(id, req.is_active)
        .await?
        .ok_or_else(|| AppError::not_found("Detection rule"))?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::ToggleDetectionRule,
            resource_id: Some(rule.id.to_string()),
            details: Some(json!({"is_active": rule.is_active})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(Json(json!({
        "message": if rule.is_active { "检测规则已启用" } else { "检测规则已停用" },
        "rule": rule
    })))
}

/// 删除检测规则
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let repo = DetectionRuleRepository::new(state.db.clone());

    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found("Detection rule"));
    }

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::DeleteDetectionRule,
            resource_id: Some(id.to_string()),
            details: None,
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(StatusCode::NO_CONTENT)
}

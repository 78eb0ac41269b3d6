//! 告警处理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::{get_client_ip, get_user_agent, AppState},
    models::{
        alert::{Alert, AlertListQuery, AlertStatus},
        audit::AuditAction,
    },
    repository::AlertRepository,
    services::audit_service::AuditEntry,
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 按条件分页查询告警
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(query): Query<AlertListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = query.normalized();

    let repo = AlertRepository::new(state.db.clone());
    let alerts = repo.list(query.severity, query.status, limit, offset).await?;

    Ok(Json(alerts))
}

/// 告警统计
pub async fn alert_stats(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = AlertRepository::new(state.db.clone());
    let stats = repo.stats().await?;

    Ok(Json(stats))
}

/// 解决告警
pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    close_alert(state, auth_context, id, headers, AlertStatus::Resolved).await
}

/// 忽略告警
pub async fn dismiss_alert(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    close_alert(state, auth_context, id, headers, AlertStatus::Dismissed).await
}

/// 将告警置为终态
///
/// 重复置为同一终态是幂等的：返回当前记录，不产生新的审计日志。
/// 置为另一个终态则拒绝，避免覆盖已有处理结论。
async fn close_alert(
    state: Arc<AppState>,
    auth_context: AuthContext,
    id: i32,
    headers: HeaderMap,
    target: AlertStatus,
) -> Result<Json<Alert>, AppError> {
    let repo = AlertRepository::new(state.db.clone());

    if let Some(alert) = repo.close(id, target, auth_context.user_id).await? {
        let action = match target {
            AlertStatus::Resolved => AuditAction::ResolveAlert,
            _ => AuditAction::DismissAlert,
        };

        let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
        state
            .audit_service
            .record(AuditEntry {
                user_id: auth_context.user_id,
                action,
                resource_id: Some(alert.id.to_string()),
                details: Some(json!({"title": alert.title, "severity": alert.severity})),
                ip_address: Some(&client_ip),
                user_agent: get_user_agent(&headers).as_deref(),
            })
            .await;

        return Ok(Json(alert));
    }

    // 没有可更新的行：不存在，或已处于终态
    let alert = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Alert"))?;

    if alert.status == target {
        // 幂等：重复操作返回现状，不再写审计
        return Ok(Json(alert));
    }

    Err(AppError::conflict(format!(
        "Alert is already {}",
        alert.status.as_str()
    )))
}

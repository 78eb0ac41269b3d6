//! 监控设备管理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::{get_client_ip, get_user_agent, AppState},
    models::{audit::AuditAction, device::*},
    repository::DeviceRepository,
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

/// 列出设备
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = DeviceRepository::new(state.db.clone());
    let devices = repo.list().await?;

    Ok(Json(devices))
}

/// 创建设备
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    headers: HeaderMap,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    // IP 地址必须是合法的 IPv4/IPv6
    req.ip_address
        .parse::<std::net::IpAddr>()
        .map_err(|_| AppError::Validation("ip_address is not a valid IP address".to_string()))?;

    let repo = DeviceRepository::new(state.db.clone());
    let device = repo.create(&req).await?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::CreateDevice,
            resource_id: Some(device.id.to_string()),
            details: Some(json!({"name": device.name, "ip_address": device.ip_address})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "设备创建成功",
            "device": device
        })),
    ))
}

/// 更新设备
pub async fn update_device(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if let Some(ip) = &req.ip_address {
        ip.parse::<std::net::IpAddr>()
            .map_err(|_| AppError::Validation("ip_address is not a valid IP address".to_string()))?;
    }

    let repo = DeviceRepository::new(state.db.clone());
    let device = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Device"))?;

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::UpdateDevice,
            resource_id: Some(device.id.to_string()),
            details: Some(json!({"name": device.name})),
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(Json(json!({
        "message": "设备更新成功",
        "device": device
    })))
}

/// 删除设备
pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let repo = DeviceRepository::new(state.db.clone());

    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found("Device"));
    }

    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);
    state
        .audit_service
        .record(AuditEntry {
            user_id: auth_context.user_id,
            action: AuditAction::DeleteDevice,
            resource_id: Some(id.to_string()),
            details: None,
            ip_address: Some(&client_ip),
            user_agent: get_user_agent(&headers).as_deref(),
        })
        .await;

    Ok(StatusCode::NO_CONTENT)
}

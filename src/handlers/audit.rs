//! 审计日志查询的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState,
    models::audit::AuditLogQuery,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 分页查询审计日志
pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(query): Query<AuditLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = query.normalized();

    let logs = state.audit_service.query_logs(&query, limit, offset).await?;
    let total = state.audit_service.count_logs(&query).await?;

    Ok(Json(json!({
        "logs": logs,
        "total": total,
        "page": query.page.max(1),
        "limit": limit
    })))
}

//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::{
    auth::session::SessionManager,
    config::AppConfig,
    handlers,
    middleware::AppState,
    services::{AuditService, AuthService, PermissionService},
};

/// 请求体大小上限（1 MiB）
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// 从配置和数据库连接池构建应用状态
pub fn build_state(config: AppConfig, db: sqlx::PgPool) -> Arc<AppState> {
    let sessions = Arc::new(SessionManager::new(config.security.session_ttl_secs));

    let auth_service = Arc::new(AuthService::new(db.clone(), sessions.clone()));
    let permission_service = Arc::new(PermissionService::new(db.clone()));
    let audit_service = Arc::new(AuditService::new(db.clone()));

    Arc::new(AppState {
        config,
        db,
        sessions,
        auth_service,
        permission_service,
        audit_service,
    })
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需会话）
    let auth_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        // 当前用户信息
        .route("/api/auth/user", get(handlers::auth::get_current_user))

        // 仪表盘
        .route("/api/dashboard/stats", get(handlers::dashboard::dashboard_stats))
        .route("/api/dashboard/traffic-chart", get(handlers::dashboard::traffic_chart))
        .route(
            "/api/dashboard/protocol-distribution",
            get(handlers::dashboard::protocol_distribution),
        )
        .route("/api/dashboard/recent-alerts", get(handlers::dashboard::recent_alerts))
        .route("/api/dashboard/top-sources", get(handlers::dashboard::top_sources))

        // 设备管理
        .route(
            "/api/devices",
            get(handlers::device::list_devices).post(handlers::device::create_device),
        )
        .route(
            "/api/devices/{id}",
            put(handlers::device::update_device).delete(handlers::device::delete_device),
        )

        // 告警
        .route("/api/alerts", get(handlers::alert::list_alerts))
        .route("/api/alerts/stats", get(handlers::alert::alert_stats))
        .route("/api/alerts/{id}/resolve", put(handlers::alert::resolve_alert))
        .route("/api/alerts/{id}/dismiss", put(handlers::alert::dismiss_alert))

        // 检测规则
        .route(
            "/api/detection-rules",
            get(handlers::rule::list_rules).post(handlers::rule::create_rule),
        )
        .route(
            "/api/detection-rules/{id}",
            put(handlers::rule::update_rule).delete(handlers::rule::delete_rule),
        )
        .route(
            "/api/detection-rules/{id}/toggle",
            axum::routing::patch(handlers::rule::toggle_rule),
        )

        // 用户管理（管理员）
        .route(
            "/api/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route("/api/users/{id}", axum::routing::delete(handlers::user::delete_user))
        .route("/api/users/{id}/role", put(handlers::user::update_user_role))
        .route("/api/users/{id}/status", put(handlers::user::update_user_status))

        // 审计日志
        .route("/api/audit-logs", get(handlers::audit::list_audit_logs))

        // 系统配置（管理员）
        .route(
            "/api/system-config",
            get(handlers::system_config::list_system_config),
        )
        .route(
            "/api/system-config/{key}",
            put(handlers::system_config::update_system_config),
        )
        .layer(axum::middleware::from_fn_with_state(
            (
                state.sessions.clone(),
                state.config.security.session_cookie_name.clone(),
            ),
            crate::auth::middleware::session_auth_middleware,
        ));

    // 指标端点
    let metrics_routes = Router::new().route("/metrics", get(handlers::metrics::metrics_export));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .merge(metrics_routes)
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state)
}

//! 权限控制与审计 API 集成测试

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::Row;
use tower::ServiceExt;

mod common;
use common::{create_test_app_state, create_test_config, create_test_user, setup_test_db};

use netmon_system::models::user::Role;

/// 登录并返回会话 Cookie
async fn login(app: &axum::Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"username": username, "password": password}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
#[ignore = "需要数据库连接"]
async fn test_user_management_requires_admin() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "reader", "TestPass123", Role::Readonly)
        .await
        .unwrap();

    let state = create_test_app_state(pool);
    let app = netmon_system::routes::create_router(state);

    let cookie = login(&app, "reader", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "需要数据库连接"]
async fn test_admin_cannot_change_own_role() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    let admin_id = create_test_user(&pool, "boss", "TestPass123", Role::Admin)
        .await
        .unwrap();

    let state = create_test_app_state(pool);
    let app = netmon_system::routes::create_router(state);

    let cookie = login(&app, "boss", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/users/{}/role", admin_id))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"role": "readonly"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "需要数据库连接"]
async fn test_delete_user_requires_confirmation() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "boss", "TestPass123", Role::Admin)
        .await
        .unwrap();
    let victim_id = create_test_user(&pool, "victim", "TestPass123", Role::Readonly)
        .await
        .unwrap();

    let state = create_test_app_state(pool);
    let app = netmon_system::routes::create_router(state);

    let cookie = login(&app, "boss", "TestPass123").await;

    // 缺少 confirm 参数
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{}", victim_id))
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // confirm 与用户名不一致
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{}?confirm=wrongname", victim_id))
                .header(header::COOKIE, cookie.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 正确的确认
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{}?confirm=victim", victim_id))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "需要数据库连接"]
async fn test_device_creation_writes_audit_log() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "operator", "TestPass123", Role::Operator)
        .await
        .unwrap();

    let state = create_test_app_state(pool.clone());
    let app = netmon_system::routes::create_router(state);

    let cookie = login(&app, "operator", "TestPass123").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/devices")
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "name": "core-switch",
                        "ip_address": "10.0.0.1",
                        "device_type": "switch",
                        "protocol": "netflow"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["device"]["name"], "core-switch");

    // 审计日志已落库
    let row = sqlx::query("SELECT action, resource FROM audit_logs ORDER BY id DESC LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    let action: String = row.get("action");
    let resource: String = row.get("resource");
    assert_eq!(action, "CREATE_DEVICE");
    assert_eq!(resource, "device");
}

#[tokio::test]
#[ignore = "需要数据库连接"]
async fn test_deactivated_user_loses_session() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "boss", "TestPass123", Role::Admin)
        .await
        .unwrap();
    let target_id = create_test_user(&pool, "worker", "TestPass123", Role::Operator)
        .await
        .unwrap();

    let state = create_test_app_state(pool);
    let app = netmon_system::routes::create_router(state);

    let admin_cookie = login(&app, "boss", "TestPass123").await;
    let worker_cookie = login(&app, "worker", "TestPass123").await;

    // 管理员停用 worker
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/users/{}/status", target_id))
                .header(header::COOKIE, admin_cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"is_active": false}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // worker 的会话随即失效
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/user")
                .header(header::COOKIE, worker_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

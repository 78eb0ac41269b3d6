//! 检测规则 API 集成测试

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
async fn test_create_and_toggle_rule() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "operator", "TestPass123", Role::Operator)
        .await
        .unwrap();

    let state = create_test_app_state(pool);
    let app = netmon_system::routes::create_router(state);

    let cookie = login(&app, "operator", "TestPass123").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/detection-rules")
                .header(header::COOKIE, cookie.clone())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "name": "Port scan",
                        "rule_type": "threshold",
                        "conditions": {"connections_per_minute": {"gt": 100}},
                        "severity": "high"
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
    let rule_id = body["rule"]["id"].as_i64().unwrap();
    assert_eq!(body["rule"]["is_active"], true);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/detection-rules/{}/toggle", rule_id))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"is_active": false}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["rule"]["is_active"], false);
}

#[tokio::test]
#[ignore = "需要数据库连接"]
async fn test_delete_rule_detaches_alerts() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "operator", "TestPass123", Role::Operator)
        .await
        .unwrap();

    // 规则与由它产生的告警
    let rule_id: i32 = sqlx::query(
        r#"
        INSERT INTO detection_rules (name, rule_type, conditions, severity)
        VALUES ('Traffic spike', 'threshold', '{}', 'high')
        RETURNING id
        "#,
    )
    .fetch_one(&pool)
    .await
    .unwrap()
    .get(0);

    let alert_id: i32 = sqlx::query(
        r#"
        INSERT INTO alerts (title, description, severity, status, rule_id)
        VALUES ('Spike detected', 'test alert', 'high', 'pending', $1)
        RETURNING id
        "#,
    )
    .bind(rule_id)
    .fetch_one(&pool)
    .await
    .unwrap()
    .get(0);

    let state = create_test_app_state(pool.clone());
    let app = netmon_system::routes::create_router(state);

    let cookie = login(&app, "operator", "TestPass123").await;

    // 有告警引用的规则也能删除，而不是 500
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/detection-rules/{}", rule_id))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // 告警保留，来源规则引用被置空
    let row = sqlx::query("SELECT rule_id FROM alerts WHERE id = $1")
        .bind(alert_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let detached: Option<i32> = row.get("rule_id");
    assert!(detached.is_none());
}

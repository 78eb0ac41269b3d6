//! 仪表盘的 HTTP 处理器
//!
//! 设备与告警计数来自数据库，流量数字在接入采集器之前为演示数据。

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::dashboard::*,
    repository::{AlertRepository, DeviceRepository},
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Local};
use rand::Rng;
use std::sync::Arc;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// 总览统计
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let device_repo = DeviceRepository::new(state.db.clone());
    let alert_repo = AlertRepository::new(state.db.clone());

    let online_devices = device_repo.count_online().await?;
    let anomalies = alert_repo.count_pending().await?;

    // 流量数字暂为演示数据
    let stats = DashboardStats {
        total_traffic: 2.34 * 1024.0 * GIB,
        traffic_growth: 12.5,
        active_connections: 1247,
        connections_growth: 8.2,
        anomalies,
        anomalies_growth: 15.6,
        online_devices,
        devices_growth: 2.1,
    };

    Ok(Json(stats))
}

/// 流量趋势图
pub async fn traffic_chart(
    _auth_context: AuthContext,
    Query(query): Query<TrafficChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let hours = query.hours.clamp(1, 168);

    let mut labels = Vec::with_capacity(hours as usize + 1);
    let mut inbound = Vec::with_capacity(hours as usize + 1);
    let mut outbound = Vec::with_capacity(hours as usize + 1);

    let now = Local::now();
    let mut rng = rand::thread_rng();

    for i in (0..=hours).rev() {
        let time = now - Duration::hours(i);
        labels.push(time.format("%H:%M").to_string());
        inbound.push(rng.gen_range(100.0..600.0));
        outbound.push(rng.gen_range(80.0..480.0));
    }

    Ok(Json(TrafficChartData {
        labels,
        datasets: vec![
            TrafficDataset {
                label: "入站流量 (Mbps)".to_string(),
                data: inbound,
                border_color: "#3b82f6".to_string(),
                background_color: "rgba(59, 130, 246, 0.1)".to_string(),
            },
            TrafficDataset {
                label: "出站流量 (Mbps)".to_string(),
                data: outbound,
                border_color: "#10b981".to_string(),
                background_color: "rgba(16, 185, 129, 0.1)".to_string(),
            },
        ],
    }))
}

/// 协议流量占比
pub async fn protocol_distribution(
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let shares = vec![
        ProtocolShare {
            name: "HTTP/HTTPS".to_string(),
            percentage: 45.0,
            bytes: 1.2 * GIB,
        },
        ProtocolShare {
            name: "FTP".to_string(),
            percentage: 15.0,
            bytes: 0.4 * GIB,
        },
        ProtocolShare {
            name: "SSH".to_string(),
            percentage: 12.0,
            bytes: 0.32 * GIB,
        },
        ProtocolShare {
            name: "DNS".to_string(),
            percentage: 10.0,
            bytes: 0.27 * GIB,
        },
        ProtocolShare {
            name: "SMTP".to_string(),
            percentage: 8.0,
            bytes: 0.21 * GIB,
        },
        ProtocolShare {
            name: "Other".to_string(),
            percentage: 10.0,
            bytes: 0.27 * GIB,
        },
    ];

    Ok(Json(shares))
}

/// 最近告警
pub async fn recent_alerts(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = AlertRepository::new(state.db.clone());
    let alerts = repo.recent(5).await?;

    Ok(Json(alerts))
}

/// 流量来源排行
pub async fn top_sources(
    _auth_context: AuthContext,
    Query(query): Query<TopSourcesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sources = vec![
        TopSource {
            source_ip: "192.168.1.10".to_string(),
            device_type: "内网服务器".to_string(),
            total_bytes: 234.5 * MIB,
            total_connections: 1247,
        },
        TopSource {
            source_ip: "10.0.1.25".to_string(),
            device_type: "Web服务器".to_string(),
            total_bytes: 156.8 * MIB,
            total_connections: 892,
        },
        TopSource {
            source_ip: "172.16.0.100".to_string(),
            device_type: "数据库服务器".to_string(),
            total_bytes: 98.3 * MIB,
            total_connections: 445,
        },
    ];

    let limit = query.limit.clamp(1, 100) as usize;
    let sources: Vec<TopSource> = sources.into_iter().take(limit).collect();

    Ok(Json(sources))
}

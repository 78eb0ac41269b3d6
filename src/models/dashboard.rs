//! Dashboard view models
//!
//! 流量相关的数值在接入真实采集器之前使用内置的演示数据，
//! 设备与告警计数来自数据库实时统计。

use serde::{Deserialize, Serialize};

/// 仪表盘总览统计
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    /// 总流量（字节）
    pub total_traffic: f64,
    pub traffic_growth: f64,
    pub active_connections: i64,
    pub connections_growth: f64,
    pub anomalies: i64,
    pub anomalies_growth: f64,
    pub online_devices: i64,
    pub devices_growth: f64,
}

/// 流量趋势图的一条曲线
#[derive(Debug, Serialize)]
pub struct TrafficDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
}

/// 流量趋势图数据
#[derive(Debug, Serialize)]
pub struct TrafficChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<TrafficDataset>,
}

#[derive(Debug, Deserialize)]
pub struct TrafficChartQuery {
    #[serde(default = "default_hours")]
    pub hours: i64,
}

fn default_hours() -> i64 {
    24
}

/// 协议流量占比
#[derive(Debug, Serialize)]
pub struct ProtocolShare {
    pub name: String,
    pub percentage: f64,
    pub bytes: f64,
}

/// 流量来源排行
#[derive(Debug, Serialize)]
pub struct TopSource {
    pub source_ip: String,
    pub device_type: String,
    pub total_bytes: f64,
    pub total_connections: i64,
}

#[derive(Debug, Deserialize)]
pub struct TopSourcesQuery {
    #[serde(default = "default_top_limit")]
    pub limit: i64,
}

fn default_top_limit() -> i64 {
    10
}

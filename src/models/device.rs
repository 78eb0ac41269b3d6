//! Device domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 采集协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "protocol_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Netflow,
    Sflow,
    Snmp,
    Pcap,
}

/// 设备状态（由外部采集器驱动，本服务只存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "device_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Error,
}

/// Monitored network device
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub id: i32,
    pub name: String,
    pub ip_address: String,
    pub device_type: String,
    pub protocol: Protocol,
    pub status: DeviceStatus,
    pub description: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create device request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 45))]
    pub ip_address: String,
    #[validate(length(min = 1, max = 100))]
    pub device_type: String,
    pub protocol: Protocol,
    pub status: Option<DeviceStatus>,
    pub description: Option<String>,
}

/// Update device request，未提供的字段保持原值
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDeviceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 45))]
    pub ip_address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub device_type: Option<String>,
    pub protocol: Option<Protocol>,
    pub status: Option<DeviceStatus>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_serde() {
        let p: Protocol = serde_json::from_str("\"netflow\"").unwrap();
        assert_eq!(p, Protocol::Netflow);

        // 未知协议必须被拒绝
        assert!(serde_json::from_str::<Protocol>("\"ipfix\"").is_err());
    }

    #[test]
    fn test_create_device_request_validation() {
        let req = CreateDeviceRequest {
            name: "".to_string(),
            ip_address: "10.0.0.1".to_string(),
            device_type: "switch".to_string(),
            protocol: Protocol::Netflow,
            status: None,
            description: None,
        };
        assert!(validator::Validate::validate(&req).is_err());
    }
}

//! 数据模型模块
//! 用户与角色、设备、告警、检测规则、审计日志、系统配置与仪表盘模型

pub mod alert;
pub mod audit;
pub mod dashboard;
pub mod device;
pub mod rule;
pub mod system_config;
pub mod user;

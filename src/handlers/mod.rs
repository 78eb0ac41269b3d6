//! HTTP 处理器

pub mod alert;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod device;
pub mod health;
pub mod metrics;
pub mod rule;
pub mod system_config;
pub mod user;

//! 数据库访问层

pub mod alert_repo;
pub mod audit_repo;
pub mod config_repo;
pub mod device_repo;
pub mod rule_repo;
pub mod user_repo;

pub use alert_repo::AlertRepository;
pub use audit_repo::AuditRepository;
pub use config_repo::SystemConfigRepository;
pub use device_repo::DeviceRepository;
pub use rule_repo::DetectionRuleRepository;
pub use user_repo::UserRepository;

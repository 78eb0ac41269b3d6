//! 业务服务层

pub mod audit_service;
pub mod auth_service;
pub mod permission_service;

pub use audit_service::AuditService;
pub use auth_service::AuthService;
pub use permission_service::PermissionService;

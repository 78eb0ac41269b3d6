//! 审计模型单元测试
//!
//! 测试审计动作枚举的编码和资源归类

use netmon_system::models::audit::{AuditAction, AuditLogQuery};

#[test]
fn test_audit_action_codes() {
    assert_eq!(AuditAction::CreateDevice.as_str(), "CREATE_DEVICE");
    assert_eq!(AuditAction::UpdateDevice.as_str(), "UPDATE_DEVICE");
    assert_eq!(AuditAction::DeleteDevice.as_str(), "DELETE_DEVICE");

    assert_eq!(AuditAction::ResolveAlert.as_str(), "RESOLVE_ALERT");
    assert_eq!(AuditAction::DismissAlert.as_str(), "DISMISS_ALERT");

    assert_eq!(AuditAction::CreateDetectionRule.as_str(), "CREATE_DETECTION_RULE");
    assert_eq!(AuditAction::UpdateDetectionRule.as_str(), "UPDATE_DETECTION_RULE");
    assert_eq!(AuditAction::ToggleDetectionRule.as_str(), "TOGGLE_DETECTION_RULE");
    assert_eq!(AuditAction::DeleteDetectionRule.as_str(), "DELETE_DETECTION_RULE");

    assert_eq!(AuditAction::CreateUser.as_str(), "CREATE_USER");
    assert_eq!(AuditAction::UpdateUserRole.as_str(), "UPDATE_USER_ROLE");
    assert_eq!(AuditAction::UpdateUserStatus.as_str(), "UPDATE_USER_STATUS");
    assert_eq!(AuditAction::DeleteUser.as_str(), "DELETE_USER");

    assert_eq!(AuditAction::UpdateSystemConfig.as_str(), "UPDATE_SYSTEM_CONFIG");
}

#[test]
fn test_audit_action_coverage() {
    // 每个动作都有非空编码和资源归类
    for action in AuditAction::all() {
        assert!(!action.as_str().is_empty());
        assert!(!action.resource().is_empty());
    }
}

#[test]
fn test_audit_action_resources() {
    assert_eq!(AuditAction::CreateDevice.resource(), "device");
    assert_eq!(AuditAction::ResolveAlert.resource(), "alert");
    assert_eq!(AuditAction::CreateDetectionRule.resource(), "detection_rule");
    assert_eq!(AuditAction::CreateUser.resource(), "user");
    assert_eq!(AuditAction::UpdateSystemConfig.resource(), "system_config");
}

#[test]
fn test_audit_action_serde_roundtrip() {
    let json = serde_json::to_string(&AuditAction::UpdateUserRole).unwrap();
    assert_eq!(json, "\"UPDATE_USER_ROLE\"");

    let action: AuditAction = serde_json::from_str("\"DISMISS_ALERT\"").unwrap();
    assert_eq!(action, AuditAction::DismissAlert);

    // 未登记的动作必须被拒绝
    assert!(serde_json::from_str::<AuditAction>("\"DROP_TABLES\"").is_err());
}

#[test]
fn test_audit_query_pagination_bounds() {
    let query = AuditLogQuery {
        page: -5,
        limit: 0,
        ..Default::default()
    };
    let (limit, offset) = query.normalized();
    assert_eq!(limit, 1);
    assert_eq!(offset, 0);
}

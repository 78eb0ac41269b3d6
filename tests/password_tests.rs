//! 密码哈希功能单元测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use netmon_system::auth::password::PasswordHasher;
use netmon_system::config::{
    AppConfig, BootstrapConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
};
use secrecy::Secret;

/// 创建测试配置
fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:3000".to_string(),
            graceful_shutdown_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://localhost/test".to_string()),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
        },
        security: SecurityConfig {
            session_ttl_secs: 28800,
            session_cookie_name: "netmon_session".to_string(),
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_digit: true,
            password_require_special: false,
            trust_proxy: true,
        },
        bootstrap: BootstrapConfig {
            admin_username: "admin".to_string(),
            admin_password: None,
        },
    }
}

#[test]
fn test_password_hash_and_verify() {
    let hasher = PasswordHasher::new();
    let password = "TestPassword123!";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 哈希值应该包含 argon2 标识
    assert!(hash.contains("$argon2"));

    // 验证正确密码
    hasher.verify(password, &hash).expect("Verification should succeed");
}

#[test]
fn test_password_verify_with_wrong_password() {
    let hasher = PasswordHasher::new();
    let hash = hasher.hash("TestPassword123!").unwrap();

    assert!(hasher.verify("WrongPassword1", &hash).is_err());
}

#[test]
fn test_password_hashes_are_salted() {
    let hasher = PasswordHasher::new();
    let password = "TestPassword123!";

    let hash1 = hasher.hash(password).unwrap();
    let hash2 = hasher.hash(password).unwrap();

    assert_ne!(hash1, hash2);
}

#[test]
fn test_password_policy() {
    let config = create_test_config();

    assert!(PasswordHasher::validate_password_policy("Valid123", &config).is_ok());

    // 太短
    assert!(PasswordHasher::validate_password_policy("Ab1", &config).is_err());

    // 缺少大写字母
    assert!(PasswordHasher::validate_password_policy("valid123", &config).is_err());

    // 缺少数字
    assert!(PasswordHasher::validate_password_policy("Validpass", &config).is_err());
}

#[test]
fn test_verify_rejects_malformed_hash() {
    let hasher = PasswordHasher::new();
    assert!(hasher.verify("TestPassword123!", "not-a-hash").is_err());
}

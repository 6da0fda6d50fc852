//! Tests for configuration validation

use automail_pool::config::pool::{ENV_AUDIT_CAPACITY, ENV_HEAVY_THRESHOLD, ENV_ROBOTS};
use automail_pool::config::{AutomailConfig, PoolConfig};
use automail_pool::core::{RobotKind, HEAVY_THRESHOLD};

#[test]
fn test_pool_config_defaults() {
    let cfg = PoolConfig::default();
    assert_eq!(cfg.heavy_threshold, HEAVY_THRESHOLD);
    assert_eq!(cfg.default_priority, 1);
    assert_eq!(cfg.audit_capacity, 0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_threshold() {
    let invalid = PoolConfig {
        heavy_threshold: 0,
        ..PoolConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_automail_config_empty_fleet() {
    let config = AutomailConfig {
        pool: PoolConfig::default(),
        robots: Vec::new(),
    };
    assert_eq!(
        config.validate(),
        Err("at least one robot must be defined".to_string())
    );
}

#[test]
fn test_automail_config_from_json() {
    let json = r#"{
        "pool": {
            "heavy_threshold": 1500,
            "audit_capacity": 64
        },
        "robots": ["big", "careful", "weak"]
    }"#;

    let config = AutomailConfig::from_json_str(json).unwrap();
    assert_eq!(config.pool.heavy_threshold, 1500);
    assert_eq!(config.pool.default_priority, 1);
    assert_eq!(config.pool.audit_capacity, 64);
    assert_eq!(
        config.robots,
        vec![RobotKind::Big, RobotKind::Careful, RobotKind::Weak]
    );
}

#[test]
fn test_automail_config_from_json_defaults() {
    let config = AutomailConfig::from_json_str("{}").unwrap();
    assert_eq!(config, AutomailConfig::default());
}

#[test]
fn test_automail_config_from_json_rejects_unknown_kind() {
    let err = AutomailConfig::from_json_str(r#"{"robots": ["drone"]}"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_automail_config_from_vars() {
    let vars = [
        (ENV_HEAVY_THRESHOLD, "2500"),
        (ENV_AUDIT_CAPACITY, "8"),
        (ENV_ROBOTS, "standard, weak,careful"),
        ("PATH", "/usr/bin"),
    ];
    let config = AutomailConfig::from_vars(vars).unwrap();
    assert_eq!(config.pool.heavy_threshold, 2500);
    assert_eq!(config.pool.audit_capacity, 8);
    assert_eq!(
        config.robots,
        vec![RobotKind::Standard, RobotKind::Weak, RobotKind::Careful]
    );
}

#[test]
fn test_automail_config_from_vars_rejects_bad_values() {
    let err = AutomailConfig::from_vars([(ENV_HEAVY_THRESHOLD, "heavy")]).unwrap_err();
    assert!(err.starts_with(ENV_HEAVY_THRESHOLD));

    let err = AutomailConfig::from_vars([(ENV_ROBOTS, "standard,hover")]).unwrap_err();
    assert!(err.contains("unknown robot kind `hover`"));

    assert!(AutomailConfig::from_vars([(ENV_ROBOTS, "")]).is_err());
}

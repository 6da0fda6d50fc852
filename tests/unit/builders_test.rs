//! Tests for builder modules

use automail_pool::builders::{build_fleet, build_pool};
use automail_pool::config::{AutomailConfig, PoolConfig};
use automail_pool::core::{
    DeliveryRobot, MailItem, MailPool, PoolError, Robot, RobotKind, RobotState,
};

#[test]
fn test_build_fleet_assigns_ids_in_order() {
    let config = AutomailConfig {
        pool: PoolConfig::default(),
        robots: vec![RobotKind::Big, RobotKind::Weak],
    };

    let fleet = build_fleet::<MailItem>(&config).unwrap();
    assert_eq!(fleet.len(), 2);

    let first = fleet[0].lock();
    assert_eq!(first.id(), 1);
    assert_eq!(first.kind(), RobotKind::Big);
    assert_eq!(first.max_intake(), 6);
    assert_eq!(first.state(), RobotState::Waiting);
    assert_eq!(fleet[1].lock().id(), 2);
}

#[test]
fn test_build_fleet_rejects_invalid_config() {
    let config = AutomailConfig {
        pool: PoolConfig::default(),
        robots: Vec::new(),
    };
    let err = build_fleet::<MailItem>(&config).unwrap_err();
    assert!(matches!(err, PoolError::InvalidConfig(_)));
}

#[test]
fn test_build_pool_applies_rules_and_audit() {
    let config = AutomailConfig {
        pool: PoolConfig {
            heavy_threshold: 500,
            default_priority: 2,
            audit_capacity: 4,
        },
        robots: vec![RobotKind::Standard],
    };

    let (mut pool, sink): (MailPool<MailItem, DeliveryRobot<MailItem>>, _) = build_pool(&config).unwrap();
    pool.add_item(MailItem::new("m1", 3, 0, 600, false));

    assert_eq!(pool.light_count(), 0);
    assert_eq!(pool.pending()[0].priority(), 2);
    let sink = sink.expect("audit enabled");
    assert_eq!(sink.lock().events().len(), 1);
}

#[test]
fn test_build_pool_without_audit() {
    let config = AutomailConfig::default();
    let (pool, sink): (MailPool<MailItem, DeliveryRobot<MailItem>>, _) = build_pool(&config).unwrap();
    assert!(pool.is_empty());
    assert!(sink.is_none());
}

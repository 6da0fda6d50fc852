//! Tests for error types

use automail_pool::core::{MailItem, PoolError, TubeError};

#[test]
fn test_tube_full_error() {
    let err = PoolError::TubeFull {
        robot: 2,
        mail_id: "m7".to_string(),
        capacity: 4,
    };
    assert_eq!(format!("{}", err), "tube full: robot 2 rejected mail m7 at capacity 4");
}

#[test]
fn test_fragile_item_broken_error() {
    let err = PoolError::FragileItemBroken {
        robot: 3,
        mail_id: "vase".to_string(),
    };
    assert_eq!(format!("{}", err), "fragile item broken: mail vase on robot 3");
}

#[test]
fn test_invalid_config_error() {
    let err = PoolError::InvalidConfig("no robots".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: no robots");
}

#[test]
fn test_tube_error_returns_item() {
    let err = TubeError::Full {
        capacity: 3,
        item: MailItem::new("m1", 2, 0, 100, false),
    };
    assert_eq!(format!("{}", err), "tube full (capacity 3)");
    assert_eq!(err.into_item().id, "m1");
}

#[test]
fn test_app_result_wraps_pool_error() {
    fn fail() -> automail_pool::core::AppResult<()> {
        let outcome: Result<(), PoolError> = Err(PoolError::InvalidConfig("bad".into()));
        outcome?;
        Ok(())
    }
    let err = fail().unwrap_err();
    assert!(err.downcast_ref::<PoolError>().is_some());
}

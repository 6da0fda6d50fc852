//! # Automail Pool
//!
//! Allocation engine for a mailroom simulation: holds undelivered mail in
//! priority order and, on every simulation tick, loads waiting delivery
//! robots according to what each robot is able to carry.
//!
//! ## Matching Rules
//!
//! - **Ordering**: higher priority first, then higher destination floor;
//!   equal keys keep arrival order
//! - **Careful robots** take a single fragile item, alone, before anything else
//! - **Strong robots** take any non-fragile mail up to their intake limit
//! - **Other robots** take only light, non-fragile mail
//! - A robot is dispatched only when mail was actually committed to its tube
//!
//! ## Example
//!
//! ```rust
//! use automail_pool::core::{DeliveryRobot, MailItem, MailPool, RobotKind};
//!
//! let mut pool = MailPool::new();
//! pool.add_item(MailItem::new("m1", 5, 0, 300, false).with_priority(3));
//! pool.add_item(MailItem::new("m2", 9, 0, 2500, false));
//!
//! let robot = DeliveryRobot::new(1, RobotKind::Weak).into_handle();
//! pool.register_waiting(robot.clone());
//!
//! let report = pool.step().expect("no fragile mail to break");
//! assert_eq!(report.dispatched, vec![1]);
//! assert_eq!(pool.len(), 1); // the heavy item waits for a strong robot
//! ```
//!
//! For complete scenarios, see `tests/mail_pool_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Mail descriptors, ordering, tubes, robots and the allocation pool.
pub mod core;
/// Configuration models for the pool and fleet.
pub mod config;
/// Builders to construct the pool and fleet from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;

//! Mail descriptors, ordering, tubes, robots and the allocation pool.

pub mod audit;
pub mod error;
pub mod mail;
pub mod mail_pool;
pub mod ordering;
pub mod robot;
pub mod tube;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, PoolError};
pub use mail::{IntakeRules, ItemDescriptor, Mail, MailItem, DEFAULT_PRIORITY, HEAVY_THRESHOLD};
pub use mail_pool::{MailPool, SharedMailPool, TickReport};
pub use ordering::dispatch_order;
pub use robot::{Capabilities, DeliveryRobot, Robot, RobotHandle, RobotId, RobotKind, RobotState};
pub use tube::{StorageTube, Tube, TubeError};

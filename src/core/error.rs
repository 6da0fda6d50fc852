//! Error types for mail pool operations.

use thiserror::Error;

use crate::core::robot::RobotId;

/// Errors produced by the mail pool and its builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A robot's tube refused an item during commit.
    #[error("tube full: robot {robot} rejected mail {mail_id} at capacity {capacity}")]
    TubeFull {
        /// Robot whose tube rejected the item.
        robot: RobotId,
        /// Identifier of the rejected mail item.
        mail_id: String,
        /// Capacity reported by the tube.
        capacity: usize,
    },
    /// A fragile item was damaged while being loaded.
    #[error("fragile item broken: mail {mail_id} on robot {robot}")]
    FragileItemBroken {
        /// Robot that was being loaded.
        robot: RobotId,
        /// Identifier of the damaged mail item.
        mail_id: String,
    },
    /// Configuration could not be used to build pool components.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

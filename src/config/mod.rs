//! Configuration models for the mail pool and the robot fleet.

pub mod pool;

pub use pool::{AutomailConfig, PoolConfig};

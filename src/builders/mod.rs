//! Builders to construct the pool and fleet from configuration.

pub mod fleet_builder;

pub use fleet_builder::{build_fleet, build_pool};

//! Robot capabilities and the bundled delivery robot.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::mail::Mail;
use crate::core::tube::{StorageTube, Tube};

/// Unique identifier for a robot.
pub type RobotId = u64;

/// Shared handle through which the pool reaches a robot it does not own.
pub type RobotHandle<R> = Arc<Mutex<R>>;

/// Capability flags consulted by the matching algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// May carry heavy items.
    pub strong: bool,
    /// Takes a lone fragile item before any bulk cargo.
    pub careful: bool,
}

/// A robot as seen by the mail pool.
pub trait Robot<M> {
    /// Stable identifier; the waiting queue deduplicates on it.
    fn id(&self) -> RobotId;
    /// Capability flags.
    fn capabilities(&self) -> Capabilities;
    /// Most items the robot accepts per dispatch.
    fn max_intake(&self) -> usize;
    /// The robot's tube.
    fn tube(&self) -> &dyn Tube<M>;
    /// Mutable access to the robot's tube.
    fn tube_mut(&mut self) -> &mut dyn Tube<M>;
    /// Called by the pool once mail has been committed to the tube.
    fn dispatch(&mut self);
}

/// Robot presets available to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotKind {
    /// Strong robot with a four-item tube.
    Standard,
    /// Light-duty robot with a four-item tube.
    Weak,
    /// Strong robot with a six-item tube.
    Big,
    /// Strong robot that handles fragile mail, three-item tube.
    Careful,
}

impl RobotKind {
    /// Capability flags of this preset.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Standard | Self::Big => Capabilities {
                strong: true,
                careful: false,
            },
            Self::Weak => Capabilities {
                strong: false,
                careful: false,
            },
            Self::Careful => Capabilities {
                strong: true,
                careful: true,
            },
        }
    }

    /// Tube capacity of this preset.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Standard | Self::Weak => 4,
            Self::Big => 6,
            Self::Careful => 3,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Weak => "weak",
            Self::Big => "big",
            Self::Careful => "careful",
        }
    }
}

impl fmt::Display for RobotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RobotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "weak" => Ok(Self::Weak),
            "big" => Ok(Self::Big),
            "careful" => Ok(Self::Careful),
            other => Err(format!("unknown robot kind `{other}`")),
        }
    }
}

/// Where a delivery robot is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotState {
    /// In the mailroom, ready for loading.
    Waiting,
    /// Loaded and released to deliver.
    Delivering,
}

/// Robot built from a [`RobotKind`] preset.
#[derive(Debug)]
pub struct DeliveryRobot<M> {
    id: RobotId,
    kind: RobotKind,
    state: RobotState,
    tube: StorageTube<M>,
}

impl<M> DeliveryRobot<M> {
    /// Create a robot in the mailroom with an empty tube.
    pub fn new(id: RobotId, kind: RobotKind) -> Self {
        Self {
            id,
            kind,
            state: RobotState::Waiting,
            tube: StorageTube::new(kind.capacity()),
        }
    }

    /// Wrap the robot in a shared handle.
    pub fn into_handle(self) -> RobotHandle<Self> {
        Arc::new(Mutex::new(self))
    }

    /// Preset the robot was built from.
    pub const fn kind(&self) -> RobotKind {
        self.kind
    }

    /// Current cycle state.
    pub const fn state(&self) -> RobotState {
        self.state
    }

    /// Read access to the concrete tube.
    pub const fn storage(&self) -> &StorageTube<M> {
        &self.tube
    }
}

impl<M: Mail> DeliveryRobot<M> {
    /// Empty the tube top-first and return to the mailroom.
    pub fn unload(&mut self) -> Vec<M> {
        let mut delivered = Vec::with_capacity(self.tube.len());
        while let Some(item) = self.tube.remove_top() {
            delivered.push(item);
        }
        self.state = RobotState::Waiting;
        delivered
    }
}

impl<M: Mail> Robot<M> for DeliveryRobot<M> {
    fn id(&self) -> RobotId {
        self.id
    }

    fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    fn max_intake(&self) -> usize {
        self.tube.capacity()
    }

    fn tube(&self) -> &dyn Tube<M> {
        &self.tube
    }

    fn tube_mut(&mut self) -> &mut dyn Tube<M> {
        &mut self.tube
    }

    fn dispatch(&mut self) {
        tracing::debug!("robot {} leaving mailroom with {} items", self.id, self.tube.len());
        self.state = RobotState::Delivering;
    }
}

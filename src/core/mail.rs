//! Raw mail items and the descriptors the pool orders and matches on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Weight at or above which an item is considered heavy.
pub const HEAVY_THRESHOLD: u32 = 2000;

/// Priority assigned to items that carry no explicit priority level.
pub const DEFAULT_PRIORITY: u32 = 1;

/// Read-only view of a raw mail item as supplied by the simulation.
pub trait Mail {
    /// Stable identifier used in logs, audit events and errors.
    fn id(&self) -> &str;
    /// Weight in simulation weight units.
    fn weight(&self) -> u32;
    /// Floor the item must be delivered to.
    fn destination_floor(&self) -> i32;
    /// Whether the item needs careful, isolated handling.
    fn is_fragile(&self) -> bool;
    /// Explicit priority level, if the item has one.
    fn priority_level(&self) -> Option<u32> {
        None
    }
}

impl<T: Mail + ?Sized> Mail for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn weight(&self) -> u32 {
        (**self).weight()
    }

    fn destination_floor(&self) -> i32 {
        (**self).destination_floor()
    }

    fn is_fragile(&self) -> bool {
        (**self).is_fragile()
    }

    fn priority_level(&self) -> Option<u32> {
        (**self).priority_level()
    }
}

/// Concrete mail item used by the bundled robots, tests and benches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailItem {
    /// Unique item identifier.
    pub id: String,
    /// Destination floor.
    pub destination_floor: i32,
    /// Simulation time the item arrived at the mailroom.
    pub arrival_time: u64,
    /// Weight in simulation weight units.
    pub weight: u32,
    /// Fragile items travel alone with a careful robot.
    #[serde(default)]
    pub fragile: bool,
    /// Explicit priority level for priority mail.
    #[serde(default)]
    pub priority_level: Option<u32>,
}

impl MailItem {
    /// Create ordinary (non-priority) mail.
    pub fn new(
        id: impl Into<String>,
        destination_floor: i32,
        arrival_time: u64,
        weight: u32,
        fragile: bool,
    ) -> Self {
        Self {
            id: id.into(),
            destination_floor,
            arrival_time,
            weight,
            fragile,
            priority_level: None,
        }
    }

    /// Attach an explicit priority level.
    #[must_use]
    pub const fn with_priority(mut self, level: u32) -> Self {
        self.priority_level = Some(level);
        self
    }
}

impl Mail for MailItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn destination_floor(&self) -> i32 {
        self.destination_floor
    }

    fn is_fragile(&self) -> bool {
        self.fragile
    }

    fn priority_level(&self) -> Option<u32> {
        self.priority_level
    }
}

/// Constants applied when deriving descriptors at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeRules {
    /// Items with `weight >= heavy_threshold` are heavy.
    pub heavy_threshold: u32,
    /// Priority for items without an explicit level.
    pub default_priority: u32,
}

impl Default for IntakeRules {
    fn default() -> Self {
        Self {
            heavy_threshold: HEAVY_THRESHOLD,
            default_priority: DEFAULT_PRIORITY,
        }
    }
}

/// Pending item as seen by the pool.
///
/// Derived fields are computed once at intake and travel with the payload
/// until it is committed to a tube. `seq` is the pool's intake counter and
/// orders items whose priority and floor are equal.
#[derive(Debug, Clone)]
pub struct ItemDescriptor<M> {
    pub(crate) priority: u32,
    pub(crate) destination: i32,
    pub(crate) heavy: bool,
    pub(crate) fragile: bool,
    pub(crate) seq: u64,
    pub(crate) mail: M,
}

impl<M: Mail> ItemDescriptor<M> {
    /// Derive a descriptor using the default intake rules.
    pub fn new(mail: M) -> Self {
        Self::with_rules(mail, &IntakeRules::default())
    }

    /// Derive a descriptor using the given intake rules.
    pub fn with_rules(mail: M, rules: &IntakeRules) -> Self {
        Self {
            priority: mail.priority_level().unwrap_or(rules.default_priority),
            destination: mail.destination_floor(),
            heavy: mail.weight() >= rules.heavy_threshold,
            fragile: mail.is_fragile(),
            seq: 0,
            mail,
        }
    }
}

impl<M> ItemDescriptor<M> {
    /// Effective priority (higher is more urgent).
    pub const fn priority(&self) -> u32 {
        self.priority
    }

    /// Destination floor.
    pub const fn destination(&self) -> i32 {
        self.destination
    }

    /// Whether the item is too heavy for non-strong robots.
    pub const fn is_heavy(&self) -> bool {
        self.heavy
    }

    /// Whether the item must travel alone with a careful robot.
    pub const fn is_fragile(&self) -> bool {
        self.fragile
    }

    /// Intake sequence number assigned by the pool.
    pub const fn sequence(&self) -> u64 {
        self.seq
    }

    /// Borrow the original mail item.
    pub const fn mail(&self) -> &M {
        &self.mail
    }

    /// Give up the descriptor and return the original mail item.
    pub fn into_mail(self) -> M {
        self.mail
    }

    /// Separate the derived keys from the payload.
    pub(crate) fn split(self) -> (ItemDescriptor<()>, M) {
        let Self {
            priority,
            destination,
            heavy,
            fragile,
            seq,
            mail,
        } = self;
        let keys = ItemDescriptor {
            priority,
            destination,
            heavy,
            fragile,
            seq,
            mail: (),
        };
        (keys, mail)
    }
}

impl ItemDescriptor<()> {
    /// Put a payload back under keys taken with [`split`](ItemDescriptor::split).
    pub(crate) fn attach<M>(self, mail: M) -> ItemDescriptor<M> {
        ItemDescriptor {
            priority: self.priority,
            destination: self.destination,
            heavy: self.heavy,
            fragile: self.fragile,
            seq: self.seq,
            mail,
        }
    }
}

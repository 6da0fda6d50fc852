//! Carrying containers ("tubes") that robots load mail into.

use thiserror::Error;

use crate::core::mail::Mail;

/// Reasons a tube refuses an item. The item is handed back in every case.
#[derive(Debug, Error)]
pub enum TubeError<M> {
    /// Tube is already at capacity.
    #[error("tube full (capacity {capacity})")]
    Full {
        /// Capacity of the tube.
        capacity: usize,
        /// The rejected item.
        item: M,
    },
    /// Loading the item would break a fragile item.
    #[error("fragile item broken")]
    FragileBroken {
        /// The item that could not be loaded.
        item: M,
    },
}

impl<M> TubeError<M> {
    /// Recover the rejected item.
    pub fn into_item(self) -> M {
        match self {
            Self::Full { item, .. } | Self::FragileBroken { item } => item,
        }
    }
}

/// Capacity-bounded container owned by a robot.
pub trait Tube<M> {
    /// Add an item on top; fails when the tube cannot take it.
    fn add(&mut self, item: M) -> Result<(), TubeError<M>>;
    /// Remove the most recently added item.
    fn remove_top(&mut self) -> Option<M>;
    /// Number of items held.
    fn len(&self) -> usize;
    /// Maximum number of items the tube holds.
    fn capacity(&self) -> usize;
    /// Whether the tube holds nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stack-shaped tube used by [`DeliveryRobot`](crate::core::robot::DeliveryRobot).
///
/// A fragile item must travel alone: adding a fragile item to a non-empty
/// tube, or anything to a tube holding a fragile item, breaks it.
#[derive(Debug, Clone)]
pub struct StorageTube<M> {
    capacity: usize,
    items: Vec<M>,
}

impl<M> StorageTube<M> {
    /// Create an empty tube.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Items from bottom (first loaded) to top.
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.items.iter()
    }

    /// Item that would be removed next.
    pub fn peek(&self) -> Option<&M> {
        self.items.last()
    }
}

impl<M: Mail> Tube<M> for StorageTube<M> {
    fn add(&mut self, item: M) -> Result<(), TubeError<M>> {
        if self.items.len() >= self.capacity {
            return Err(TubeError::Full {
                capacity: self.capacity,
                item,
            });
        }
        let holds_fragile = self.items.iter().any(Mail::is_fragile);
        if holds_fragile || (item.is_fragile() && !self.items.is_empty()) {
            return Err(TubeError::FragileBroken { item });
        }
        self.items.push(item);
        Ok(())
    }

    fn remove_top(&mut self) -> Option<M> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
